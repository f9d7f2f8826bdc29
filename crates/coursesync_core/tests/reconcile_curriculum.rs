use coursesync_core::model::course::{Course, Lesson, LessonKind, Module};
use coursesync_core::reconcile::action::{ActionKind, ActionPayload, ActionTarget, ChangeReason};
use coursesync_core::reconcile::reconcile_curriculum;
use coursesync_core::render::{MemoryPage, NodeDescriptor, RenderedPage};

fn phishing_course() -> Course {
    Course::new(1, "Phishing Awareness").with_module(
        Module::new("Intro").with_lesson(Lesson::new("What is Phishing?").with_duration("10")),
    )
}

#[test]
fn empty_page_gets_one_module_insert() {
    let plan = reconcile_curriculum(&phishing_course(), &[]);

    assert_eq!(plan.len(), 1);
    let action = &plan.actions()[0];
    assert_eq!(action.kind, ActionKind::Insert);
    assert_eq!(action.target, ActionTarget::Curriculum);
    let ActionPayload::Module(module) = &action.payload else {
        panic!("expected module payload, got {:?}", action.payload);
    };
    assert_eq!(module.title, "Intro");
    assert_eq!(module.duration, "30 minutes");
    assert_eq!(module.lessons.len(), 1);
    assert_eq!(module.lessons[0].duration, "10 min");
    assert_eq!(module.lessons[0].kind, LessonKind::Video);
}

#[test]
fn second_pass_on_applied_page_is_noop() {
    let course = Course::new(1, "Phishing Awareness")
        .with_module(
            Module::new("Introduction to Phishing")
                .with_lesson(Lesson::new("What is Phishing?").with_duration("10"))
                .with_lesson(Lesson::new("Spot the Phish").with_id("ex-1")),
        )
        .with_module(
            Module::new("Identifying Attacks")
                .with_duration("45 min")
                .with_lesson(Lesson::new("Common Types of Phishing Attacks").with_duration("20 min")),
        );
    let mut page = MemoryPage::new();

    let first = reconcile_curriculum(&course, &page.module_nodes());
    let report = page.apply(&first);
    assert_eq!(report.skipped, 0);
    assert_eq!(page.modules.len(), 2);

    let second = reconcile_curriculum(&course, &page.module_nodes());
    assert!(second.is_noop());
    assert_eq!(second.count(ActionKind::Noop), 2);
}

#[test]
fn resolved_module_is_rebuilt_in_lesson_order() {
    let course = Course::new(1, "Phishing Awareness").with_module(
        Module::new("Intro")
            .with_lesson(Lesson::new("Red Flags").with_duration("15"))
            .with_lesson(Lesson::new("Brand New Lesson")),
    );
    let rendered = vec![NodeDescriptor::new("module-intro")
        .with_header("Intro")
        .with_child(
            NodeDescriptor::new("lesson-old")
                .with_title("Red Flags (Admin Video)")
                .with_duration("12 min"),
        )
        .with_child(NodeDescriptor::new("lesson-gone").with_title("Removed Lesson"))];

    let plan = reconcile_curriculum(&course, &rendered);
    let actions = plan.actions();

    assert_eq!(actions.len(), 3);
    assert_eq!(actions[0].kind, ActionKind::Replace);
    assert_eq!(
        actions[0].payload,
        ActionPayload::ClearLessons {
            removed: vec!["lesson-old".to_string(), "lesson-gone".to_string()],
        }
    );
    let titles: Vec<_> = actions[1..]
        .iter()
        .map(|action| match &action.payload {
            ActionPayload::Lesson(lesson) => (lesson.title.as_str(), action.reason),
            other => panic!("unexpected payload {other:?}"),
        })
        .collect();
    assert_eq!(
        titles,
        vec![
            ("Red Flags", ChangeReason::Changed),
            ("Brand New Lesson", ChangeReason::New),
        ]
    );
    assert!(actions[1..]
        .iter()
        .all(|action| action.target == ActionTarget::Module("module-intro".to_string())));
}

#[test]
fn positional_match_renames_the_module_header() {
    let course = Course::new(1, "Phishing Awareness")
        .with_module(Module::new("Basics Revisited").with_lesson(Lesson::new("Red Flags")));
    let mut page = MemoryPage::new();
    page.modules.push(NodeDescriptor::new("module-0").with_header("Basics"));

    let plan = reconcile_curriculum(&course, &page.module_nodes());
    assert_eq!(
        plan.actions()[0].target,
        ActionTarget::ModuleHeader("module-0".to_string())
    );

    page.apply(&plan);
    assert_eq!(page.modules[0].header.as_deref(), Some("Basics Revisited"));
    assert!(reconcile_curriculum(&course, &page.module_nodes()).is_noop());
}

#[test]
fn duplicate_module_titles_claim_distinct_nodes() {
    let course = Course::new(1, "Phishing Awareness")
        .with_module(Module::new("Practice").with_lesson(Lesson::new("Quiz One")))
        .with_module(Module::new("Practice").with_lesson(Lesson::new("Quiz Two")));
    let mut page = MemoryPage::new();

    page.apply(&reconcile_curriculum(&course, &page.module_nodes()));
    assert_eq!(page.modules.len(), 2);

    let second = reconcile_curriculum(&course, &page.module_nodes());
    assert!(second.is_noop());
}

#[test]
fn modules_without_lessons_are_skipped() {
    let course = Course::new(1, "Phishing Awareness")
        .with_module(Module::new("Coming Soon"))
        .with_module(Module::new("   ").with_lesson(Lesson::new("Orphan")));

    assert!(reconcile_curriculum(&course, &[]).is_empty());
}

#[test]
fn admin_lessons_are_highlighted_on_insert() {
    let mut lesson = Lesson::new("Fresh Upload");
    lesson.added_by_admin = true;
    let course = Course::new(1, "Phishing Awareness")
        .with_module(Module::new("Intro").with_lesson(lesson));
    let mut page = MemoryPage::new();

    page.apply(&reconcile_curriculum(&course, &[]));
    assert_eq!(page.highlighted(), vec!["lesson-fresh-upload".to_string()]);
}

fn red_flags_course(lesson: Lesson) -> Course {
    Course::new(1, "Phishing Awareness").with_module(Module::new("Intro").with_lesson(lesson))
}

#[test]
fn highlight_changes_rebuild_an_applied_module() {
    let mut page = MemoryPage::new();
    let plain = red_flags_course(Lesson::new("Red Flags").with_duration("15"));
    page.apply(&reconcile_curriculum(&plain, &page.module_nodes()));
    assert!(page.highlighted().is_empty());

    let mut flagged_lesson = Lesson::new("Red Flags").with_duration("15");
    flagged_lesson.added_by_admin = true;
    let flagged = red_flags_course(flagged_lesson);
    let plan = reconcile_curriculum(&flagged, &page.module_nodes());
    assert_eq!(plan.count(ActionKind::Replace), 1);
    assert_eq!(plan.count(ActionKind::Insert), 1);
    assert_eq!(plan.actions()[1].reason, ChangeReason::Changed);

    page.apply(&plan);
    assert_eq!(page.highlighted(), vec!["lesson-red-flags".to_string()]);
    assert!(reconcile_curriculum(&flagged, &page.module_nodes()).is_noop());

    page.apply(&reconcile_curriculum(&plain, &page.module_nodes()));
    assert!(page.highlighted().is_empty());
}

#[test]
fn declared_type_changes_rebuild_an_applied_module() {
    let mut page = MemoryPage::new();
    let video = red_flags_course(Lesson::new("Red Flags"));
    page.apply(&reconcile_curriculum(&video, &page.module_nodes()));
    assert_eq!(page.lesson_kind("lesson-red-flags"), Some(LessonKind::Video));

    let document = red_flags_course(Lesson::new("Red Flags").with_kind(LessonKind::Document));
    let plan = reconcile_curriculum(&document, &page.module_nodes());
    assert!(!plan.is_noop());

    page.apply(&plan);
    assert_eq!(
        page.lesson_kind("lesson-red-flags"),
        Some(LessonKind::Document)
    );
    assert!(reconcile_curriculum(&document, &page.module_nodes()).is_noop());
}

#[test]
fn lesson_nodes_without_a_kind_are_redrawn() {
    let course = red_flags_course(Lesson::new("Red Flags").with_duration("15"));
    let rendered = vec![NodeDescriptor::new("module-intro")
        .with_header("Intro")
        .with_child(
            NodeDescriptor::new("lesson-red-flags")
                .with_title("Red Flags")
                .with_duration("15 min"),
        )];

    let plan = reconcile_curriculum(&course, &rendered);
    assert_eq!(plan.count(ActionKind::Replace), 1);
}
