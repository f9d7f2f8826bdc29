use coursesync_core::model::course::{Course, Lesson, Module};
use coursesync_core::model::template::{Assignments, Template};
use coursesync_core::store::{keys, KvStore, MemoryStore, RecordStore, SqliteKvStore};
use coursesync_core::db::open_db_in_memory;

#[test]
fn missing_keys_read_as_empty() {
    let records = RecordStore::new(MemoryStore::new());

    assert!(records.courses().unwrap().is_empty());
    assert!(records.templates().unwrap().is_empty());
    assert!(records.assignments().unwrap().is_empty());
    assert!(records.user_videos().unwrap().is_empty());
    assert!(records.settings_document().unwrap().is_null());
    assert_eq!(records.last_update(keys::COURSES_LAST_UPDATE).unwrap(), None);
    assert_eq!(records.latest_update().unwrap(), 0);
    assert!(!records.lesson_injection_disabled().unwrap());
}

#[test]
fn malformed_json_reads_as_empty() {
    let records = RecordStore::new(MemoryStore::new());
    records.kv().set(keys::COURSES, "[{not json").unwrap();
    records.kv().set(keys::ASSIGNMENTS, "42").unwrap();

    assert!(records.courses().unwrap().is_empty());
    assert!(records.assignments().unwrap().is_empty());
}

#[test]
fn courses_round_trip_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let records = RecordStore::new(SqliteKvStore::new(&conn));
    let course = Course::new(1, "Phishing Awareness").with_module(
        Module::new("Intro").with_lesson(Lesson::new("What is Phishing?").with_duration("10")),
    );

    records.save_courses(&[course.clone()]).unwrap();

    assert_eq!(records.courses().unwrap(), vec![course]);
    let raw = records.kv().get(keys::COURSES).unwrap().unwrap();
    assert!(raw.contains(r#""id":1"#));
}

#[test]
fn numeric_and_string_ids_are_the_same_assignment_key() {
    let records = RecordStore::new(MemoryStore::new());
    records
        .kv()
        .set(keys::ASSIGNMENTS, r#"{"3": 9}"#)
        .unwrap();
    records.save_templates(&[Template::new("9", "Phishing")]).unwrap();

    let assignments: Assignments = records.assignments().unwrap();
    let templates = records.templates().unwrap();
    assert_eq!(assignments.get(&3.into()), Some(&templates[0].id));
}

#[test]
fn timestamps_are_decimal_strings() {
    let records = RecordStore::new(MemoryStore::new());
    records
        .set_last_update(keys::COURSES_LAST_UPDATE, 1_700_000_000_000)
        .unwrap();
    records.kv().set(keys::TEMPLATES_LAST_UPDATE, "soon").unwrap();

    assert_eq!(
        records.kv().get(keys::COURSES_LAST_UPDATE).unwrap().as_deref(),
        Some("1700000000000")
    );
    assert_eq!(records.last_update(keys::TEMPLATES_LAST_UPDATE).unwrap(), None);
    assert_eq!(records.latest_update().unwrap(), 1_700_000_000_000);

    records.set_last_checked(5).unwrap();
    assert_eq!(records.last_update(keys::LAST_CHECK).unwrap(), Some(5));
}

#[test]
fn injection_flag_is_true_only_for_literal_true() {
    let records = RecordStore::new(MemoryStore::new());
    records.kv().set(keys::DISABLE_LESSON_INJECTION, "yes").unwrap();
    assert!(!records.lesson_injection_disabled().unwrap());

    records.set_lesson_injection_disabled(true).unwrap();
    assert!(records.lesson_injection_disabled().unwrap());
}

#[test]
fn loosely_typed_course_fields_do_not_drop_the_collection() {
    let records = RecordStore::new(MemoryStore::new());
    records
        .kv()
        .set(
            keys::COURSES,
            r#"[
                {"id": 1, "name": "Phishing Awareness", "enrolled": 980},
                {"id": "2", "name": "Password Security", "enrolled": "1250", "modules": [
                    {"title": "Basics", "lessons": [
                        {"title": "Strong Passwords", "addedByAdmin": "true", "isAdminVideo": 1},
                        {"title": "Password Managers", "addedByAdmin": 0, "isAdminVideo": null}
                    ]}
                ]},
                {"id": 3, "name": "Data Protection Essentials", "enrolled": 42.0}
            ]"#,
        )
        .unwrap();

    let courses = records.courses().unwrap();
    assert_eq!(courses.len(), 3);
    assert_eq!(courses[0].enrolled, Some(980));
    assert_eq!(courses[1].enrolled, Some(1250));
    assert_eq!(courses[2].enrolled, Some(42));

    let lessons = &courses[1].modules[0].lessons;
    assert!(lessons[0].added_by_admin);
    assert!(lessons[0].is_admin_video);
    assert!(lessons[0].is_highlighted());
    assert!(!lessons[1].added_by_admin);
    assert!(!lessons[1].is_admin_video);
}
