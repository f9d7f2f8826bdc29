use coursesync_core::matcher::{
    course_title_for_page, default_page_keywords, keyword_for_page, lesson_for_node,
    match_course_for_page, match_lesson_node, match_module_node, match_template_for_course,
    page_identifier,
};
use coursesync_core::model::course::{Course, Lesson, Module};
use coursesync_core::model::template::Template;
use coursesync_core::render::NodeDescriptor;

#[test]
fn template_name_contained_in_course_name_matches() {
    let course = Course::new(1, "Phishing Awareness");
    let templates = vec![
        Template::new(1, "Password basics"),
        Template::new(2, "phishing"),
    ];

    let matched = match_template_for_course(&course, &templates).unwrap();
    assert_eq!(matched.id, 2.into());
}

#[test]
fn course_name_contained_in_template_name_matches() {
    let course = Course::new(1, "Data Protection");
    let templates = vec![
        Template::new(1, "Social"),
        Template::new(2, "Data Protection Essentials Overview"),
    ];

    assert_eq!(
        match_template_for_course(&course, &templates).unwrap().id,
        2.into()
    );
}

#[test]
fn unmatched_course_falls_back_to_first_template() {
    let course = Course::new(1, "Quantum Safety");
    let templates = vec![Template::new("t1", "Phishing"), Template::new("t2", "Passwords")];

    assert_eq!(
        match_template_for_course(&course, &templates).unwrap().id,
        "t1".into()
    );
    assert!(match_template_for_course(&course, &[]).is_none());
}

#[test]
fn blank_template_names_never_match_by_containment() {
    let course = Course::new(1, "Password Security");
    let templates = vec![Template::new(1, "  "), Template::new(2, "password")];

    assert_eq!(
        match_template_for_course(&course, &templates).unwrap().id,
        2.into()
    );
}

#[test]
fn page_identifier_strips_path_query_and_extension() {
    assert_eq!(
        page_identifier("/site/course-password-security.html?tab=2#top").as_deref(),
        Some("course-password-security")
    );
    assert_eq!(page_identifier("course-phishing").as_deref(), Some("course-phishing"));
    assert_eq!(page_identifier("/site/"), None);
}

#[test]
fn course_for_page_uses_keyword_table_then_prefix() {
    let keywords = default_page_keywords();
    let courses = vec![
        Course::new(1, "Phishing Awareness"),
        Course::new(2, "Password Security Basics"),
        Course::new(3, "Cloud Hygiene"),
    ];

    assert_eq!(
        match_course_for_page("course-password-security", &courses, &keywords)
            .unwrap()
            .id,
        2.into()
    );
    assert_eq!(
        keyword_for_page("course-cloud-hygiene", &keywords).as_deref(),
        Some("cloud hygiene")
    );
    assert_eq!(
        match_course_for_page("course-cloud-hygiene", &courses, &keywords)
            .unwrap()
            .id,
        3.into()
    );
    assert!(match_course_for_page("index", &courses, &keywords).is_none());
    assert!(match_course_for_page("course-data-protection", &courses, &keywords).is_none());
}

#[test]
fn course_titles_for_uploaded_video_lookup() {
    assert_eq!(course_title_for_page("course-data-protection"), "Data Protection Essentials");
    assert_eq!(course_title_for_page("course-phishing"), "Phishing Awareness");
    assert_eq!(course_title_for_page("anything"), "Phishing Awareness");
}

#[test]
fn module_strategies_run_in_order() {
    let nodes = vec![
        NodeDescriptor::new("m0").with_title("Red Flags"),
        NodeDescriptor::new("m1").with_header("Module 2: Red Flags in Email"),
    ];

    // Header containment beats an exact title sub-element on another node.
    assert_eq!(match_module_node("Red Flags", &nodes, 0).unwrap().key, "m1");
    // Title sub-element when no header matches.
    assert_eq!(match_module_node("red flags", &nodes[..1], 3).unwrap().key, "m0");
}

#[test]
fn module_position_fallback_precedes_text_overlap() {
    let nodes = vec![
        NodeDescriptor::new("m0").with_header("Welcome"),
        NodeDescriptor::new("m1").with_text("Introduction to the course"),
    ];

    assert_eq!(match_module_node("Wrap up", &nodes, 0).unwrap().key, "m0");
    assert_eq!(
        match_module_node("Introduction and Goals", &nodes, 5).unwrap().key,
        "m1"
    );
    assert!(match_module_node("Wrap up", &nodes, 5).is_none());
    assert!(match_module_node("  ", &nodes, 0).is_none());
}

#[test]
fn lesson_nodes_match_by_id_or_title() {
    let nodes = vec![
        NodeDescriptor::new("lesson-41").with_title("Renamed Lesson"),
        NodeDescriptor::new("lesson-x").with_title("What is Phishing? (Admin Video)"),
    ];

    let by_id = Lesson::new("Red Flags").with_id(41);
    assert_eq!(match_lesson_node(&by_id, &nodes).unwrap().key, "lesson-41");

    let by_title = Lesson::new("what is phishing?");
    assert_eq!(match_lesson_node(&by_title, &nodes).unwrap().key, "lesson-x");

    let missing_id = Lesson::new("Renamed Lesson").with_id(99);
    assert!(match_lesson_node(&missing_id, &nodes).is_none());
}

#[test]
fn lesson_for_node_prefers_longest_id_then_exact_title() {
    let course = Course::new(1, "Phishing Awareness").with_module(
        Module::new("Intro")
            .with_lesson(Lesson::new("Short").with_id(4))
            .with_lesson(Lesson::new("Long").with_id(41))
            .with_lesson(Lesson::new("Red Flags in Email"))
            .with_lesson(Lesson::new("Red Flags")),
    );

    let node = NodeDescriptor::new("lesson-41").with_title("old");
    assert_eq!(lesson_for_node(&node, &course).unwrap().title, "Long");

    let node = NodeDescriptor::new("").with_title("Red Flags");
    assert_eq!(lesson_for_node(&node, &course).unwrap().title, "Red Flags");

    let node = NodeDescriptor::new("").with_title("Spotting Red Flags in Email Today");
    assert_eq!(
        lesson_for_node(&node, &course).unwrap().title,
        "Red Flags in Email"
    );
}
