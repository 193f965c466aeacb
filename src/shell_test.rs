use super::*;

// =============================================================
// Helpers
// =============================================================

fn shell() -> Shell {
    Shell::new(PlannerConfig::default())
}

fn exec(shell: &mut Shell, line: &str) -> Result<String, ShellError> {
    let mut out = Vec::new();
    shell.execute(line, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn ok(shell: &mut Shell, line: &str) -> String {
    exec(shell, line).unwrap_or_else(|e| panic!("{line:?} failed: {e}"))
}

// =============================================================
// Layout commands
// =============================================================

#[test]
fn court_and_zone_are_created() {
    let mut sh = shell();
    assert!(ok(&mut sh, "court blue").starts_with("created court 1 (blue, Hard court)"));
    assert!(ok(&mut sh, "zone").starts_with("created zone "));
    assert_eq!(sh.facility().elements().len(), 2);
}

#[test]
fn unknown_color_is_a_usage_error() {
    let mut sh = shell();
    let err = exec(&mut sh, "court pink").unwrap_err();
    assert!(matches!(err, ShellError::Usage(_)));
    assert_eq!(err.error_code(), "E_INVALID_INPUT");
}

#[test]
fn move_accepts_negative_offsets() {
    let mut sh = shell();
    ok(&mut sh, "court green");
    assert_eq!(ok(&mut sh, "move 1 -10 5"), "court 1 at (290, 305) size 150x300 rotation 0\n");
}

#[test]
fn resize_court_is_refused() {
    let mut sh = shell();
    ok(&mut sh, "court green");
    let err = exec(&mut sh, "resize 1 e 10 0").unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_INPUT");
}

#[test]
fn rotate_toggles() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    assert_eq!(ok(&mut sh, "rotate 1"), "court 1 rotated to 90\n");
    assert_eq!(ok(&mut sh, "rotate 1"), "court 1 rotated to 0\n");
}

#[test]
fn list_json_is_parseable() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    let value: serde_json::Value = serde_json::from_str(&ok(&mut sh, "list --json")).unwrap();
    assert_eq!(value[0]["kind"], "court");
    assert_eq!(value[0]["label"], 1);
}

// =============================================================
// Booking commands
// =============================================================

#[test]
fn book_joins_client_words_and_parses_deposit() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    let out = ok(&mut sh, "book 1 2024-05-01 10:00 60 Ana Lima --deposit 12.5");
    assert_eq!(out, "booked #1 2024-05-01 10:00-11:00 Ana Lima deposit 12.50\n");
}

#[test]
fn book_rejects_unoffered_duration() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    let err = exec(&mut sh, "book 1 2024-05-01 10:00 45 Ana").unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_INPUT");
    assert!(sh.facility().reservations().is_empty());
}

#[test]
fn book_rejects_bad_date() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    assert!(matches!(exec(&mut sh, "book 1 2024-13-01 10:00 60 Ana"), Err(ShellError::Usage(_))));
}

#[test]
fn overlapping_booking_conflicts() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    ok(&mut sh, "book 1 2024-05-01 10:00 60 Ana");
    let err = exec(&mut sh, "book 1 2024-05-01 10:30 60 Bo").unwrap_err();
    assert_eq!(err.error_code(), "E_CONFLICT");
    ok(&mut sh, "book 1 2024-05-01 11:00 60 Bo");
}

#[test]
fn cancel_without_yes_only_asks() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    ok(&mut sh, "book 1 2024-05-01 10:00 60 Ana");
    let prompt = ok(&mut sh, "cancel 1");
    assert!(prompt.contains("--yes"));
    assert_eq!(sh.facility().reservations().len(), 1);

    assert!(ok(&mut sh, "cancel 1 --yes").starts_with("cancelled #1"));
    assert!(sh.facility().reservations().is_empty());
    assert_eq!(exec(&mut sh, "cancel 1 --yes").unwrap_err().error_code(), "E_NOT_FOUND");
}

#[test]
fn status_and_available() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    ok(&mut sh, "court green");
    ok(&mut sh, "book 1 2024-05-01 14:00 90 Ana");
    assert_eq!(
        ok(&mut sh, "status 2024-05-01 14:30"),
        "court 1: booked by Ana until 15:30 (#1)\ncourt 2: free\n"
    );
    assert_eq!(
        ok(&mut sh, "available 2024-05-01 14:30 30"),
        "available for 2024-05-01 14:30-15:00: court 2\n"
    );
    assert_eq!(
        ok(&mut sh, "available 2024-05-01 15:30 30"),
        "available for 2024-05-01 15:30-16:00: court 1, court 2\n"
    );
}

#[test]
fn bookings_for_a_day() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    ok(&mut sh, "book 1 2024-05-01 10:00 60 Ana");
    ok(&mut sh, "book 1 2024-05-02 10:00 60 Bo");
    assert_eq!(ok(&mut sh, "bookings 1 2024-05-02"), "#2 2024-05-02 10:00-11:00 Bo deposit 0.00\n");
    assert_eq!(ok(&mut sh, "bookings 1").lines().count(), 2);
}

#[test]
fn slots_skip_bookings() {
    let mut sh = Shell::new(PlannerConfig { open_hour: 8, close_hour: 11, ..PlannerConfig::default() });
    ok(&mut sh, "court blue");
    ok(&mut sh, "book 1 2024-05-01 09:00 60 Ana");
    assert_eq!(ok(&mut sh, "slots 1 2024-05-01 60"), "08:00-09:00\n10:00-11:00\n");
}

#[test]
fn oversized_minutes_are_input_errors() {
    let mut sh = shell();
    ok(&mut sh, "court blue");
    for line in ["available 2024-05-01 10:00 9223372036854775807", "slots 1 2024-05-01 9223372036854775807"] {
        let err = exec(&mut sh, line).unwrap_err();
        assert_eq!(err.error_code(), "E_INVALID_INPUT", "{line}");
    }
}

#[test]
fn nan_offsets_are_input_errors() {
    let mut sh = shell();
    ok(&mut sh, "zone");
    let zone = sh.facility().elements()[0].clone();
    for line in [format!("resize {} e NaN 0", zone.id), format!("move {} 0 NaN", zone.id)] {
        let err = exec(&mut sh, &line).unwrap_err();
        assert_eq!(err.error_code(), "E_INVALID_INPUT", "{line}");
    }
    assert_eq!(sh.facility().elements(), vec![&zone]);
}

// =============================================================
// Scripts
// =============================================================

#[test]
fn run_skips_comments_and_counts_failures() {
    let mut sh = shell();
    let script = "# setup\ncourt blue\n\nrotate 7\nlist\n";
    let mut out = Vec::new();
    let summary = sh.run(script.as_bytes(), &mut out, true).unwrap();
    assert_eq!(summary, RunSummary { executed: 3, failed: 1 });
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("> rotate 7\nerror [E_NOT_FOUND]: no court matches \"7\"\n"));
}

#[test]
fn help_is_not_a_failure() {
    let mut sh = shell();
    assert!(ok(&mut sh, "help").contains("book"));
}
