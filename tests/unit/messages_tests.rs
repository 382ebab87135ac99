use waitline::notify::alerts::render_template;
use waitline::notify::messages;

#[test]
fn checkin_confirmation_carries_link_and_position() {
    let text = messages::checkin_confirmation(
        "Ada Lovelace",
        "Dr. Smith's Office",
        3,
        "http://localhost:5000",
        "abc123",
    );
    assert!(text.contains("Ada Lovelace"));
    assert!(text.contains("#3 in line"));
    assert!(text.contains("http://localhost:5000/status/abc123"));
}

#[test]
fn ready_now_names_the_office() {
    let text = messages::ready_now("Ada Lovelace", "Dr. Smith's Office");
    assert!(text.contains("please come in now"));
    assert!(text.contains("Dr. Smith's Office"));
}

#[test]
fn almost_ready_counts_patients_ahead() {
    let text = messages::almost_ready("Ada Lovelace", "Dr. Smith's Office", 2);
    assert!(text.contains("2 patient(s) ahead"));
    assert!(text.contains("Please be ready"));
}

#[test]
fn render_template_fills_all_placeholders() {
    let rendered = render_template(
        "{patient_name}: you are #{position}, about {wait_time} left.",
        "Ada Lovelace",
        2,
        "20 min",
    );
    assert_eq!(rendered, "Ada Lovelace: you are #2, about 20 min left.");
}

#[test]
fn render_template_ignores_unknown_placeholders() {
    let rendered = render_template("hello {whoever}", "Ada", 1, "5 min");
    assert_eq!(rendered, "hello {whoever}");
}
