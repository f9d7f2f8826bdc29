use coursesync_core::model::course::Course;
use coursesync_core::model::template::{Assignments, Template};
use coursesync_core::service::assignment_service::{
    AssignedTemplate, AssignmentError, AssignmentService,
};
use coursesync_core::store::{keys, MemoryStore, RecordStore};

fn seeded() -> RecordStore<MemoryStore> {
    let records = RecordStore::new(MemoryStore::new());
    records
        .save_courses(&[
            Course::new(1, "Phishing Awareness"),
            Course::new(2, "Password Security"),
            Course::new(3, "Quantum Safety"),
        ])
        .unwrap();
    records
        .save_templates(&[
            Template::new("general", "General Overview"),
            Template::new("pw", "Password"),
            Template::new("ph", "phishing"),
        ])
        .unwrap();
    records
}

#[test]
fn assigns_matching_or_first_template_and_bumps_stamps() {
    let records = seeded();
    let service = AssignmentService::new(&records);

    let report = service.ensure_all_assigned(1_234).unwrap();

    assert_eq!(report.assigned.len(), 3);
    let assignments = records.assignments().unwrap();
    assert_eq!(assignments.get(&1.into()), Some(&"ph".into()));
    assert_eq!(assignments.get(&2.into()), Some(&"pw".into()));
    assert_eq!(assignments.get(&3.into()), Some(&"general".into()));
    assert_eq!(
        records.last_update(keys::TEMPLATES_LAST_UPDATE).unwrap(),
        Some(1_234)
    );
    assert_eq!(
        records.last_update(keys::COURSES_LAST_UPDATE).unwrap(),
        Some(1_234)
    );
}

#[test]
fn existing_assignments_are_kept_and_no_change_means_no_stamp() {
    let records = seeded();
    let mut assignments = Assignments::default();
    assignments.assign(1.into(), "deleted-template".into());
    records.save_assignments(&assignments).unwrap();
    let service = AssignmentService::new(&records);

    service.ensure_all_assigned(10).unwrap();
    let again = service.ensure_all_assigned(20).unwrap();

    assert!(!again.changed());
    assert_eq!(
        records.assignments().unwrap().get(&1.into()),
        Some(&"deleted-template".into())
    );
    assert_eq!(
        records.last_update(keys::TEMPLATES_LAST_UPDATE).unwrap(),
        Some(10)
    );
}

#[test]
fn without_templates_nothing_is_assigned() {
    let records = seeded();
    records.save_templates(&[]).unwrap();

    let report = AssignmentService::new(&records)
        .ensure_all_assigned(5)
        .unwrap();

    assert_eq!(report.skipped, 3);
    assert!(records.assignments().unwrap().is_empty());
    assert_eq!(records.last_update(keys::COURSES_LAST_UPDATE).unwrap(), None);
}

#[test]
fn reports_assignment_state_per_course() {
    let records = seeded();
    let mut assignments = Assignments::default();
    assignments.assign(1.into(), "ph".into());
    assignments.assign(2.into(), "gone".into());
    records.save_assignments(&assignments).unwrap();
    let service = AssignmentService::new(&records);

    assert!(matches!(
        service.assigned_template(&Course::new(1, "Phishing Awareness")).unwrap(),
        AssignedTemplate::Assigned(template) if template.name == "phishing"
    ));
    assert_eq!(
        service.assigned_template(&Course::new(2, "Password Security")).unwrap(),
        AssignedTemplate::Dangling("gone".into())
    );
    assert_eq!(
        service.assigned_template(&Course::new(3, "Quantum Safety")).unwrap(),
        AssignedTemplate::Unassigned
    );
    assert!(matches!(
        service.assigned_template(&Course::new("", "Nameless")),
        Err(AssignmentError::InvalidCourseId)
    ));
}
