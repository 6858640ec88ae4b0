//! Command dispatch through the full read → frame → parse → apply path.

use std::time::Duration;

use tempreport::app::commands::Command;
use tempreport::app::state::LoopState;
use tempreport::sensors::Unit;

use crate::mock_io::{ScriptedSensor, ScriptedTransport, networked_config, rig, rig_with, steady_reading};

#[test]
fn batched_lines_apply_in_arrival_order() {
    let (mut reporter, rig) = rig(ScriptedTransport::new().chunk(b"PERIOD=5\nPERIOD=9\n"));

    reporter.iterate().unwrap();

    assert_eq!(reporter.state().interval(), Duration::from_secs(9));
    assert_eq!(
        rig.log.lines(),
        [
            format!("12:00:00 {}", steady_reading(Unit::Fahrenheit)),
            "12:00:00 PERIOD=5".to_string(),
            "12:00:00 PERIOD=9".to_string(),
        ]
    );
    assert_eq!(rig.clock.sleeps(), [Duration::from_secs(9)]);
}

#[test]
fn a_line_split_across_reads_dispatches_once_complete() {
    let (mut reporter, rig) = rig(ScriptedTransport::new().chunk(b"STO").chunk(b"P\n"));

    reporter.iterate().unwrap();
    assert_eq!(rig.log.count("STOP"), 0);
    assert_eq!(reporter.loop_state(), LoopState::Running);

    reporter.iterate().unwrap();
    assert_eq!(rig.log.count("STOP"), 1);
    assert!(rig.log.lines().contains(&"12:00:01 STOP".to_string()));
    assert_eq!(reporter.loop_state(), LoopState::Paused);
}

#[test]
fn invalid_periods_change_nothing_and_leave_no_record() {
    let (mut reporter, rig) =
        rig(ScriptedTransport::new().chunk(b"PERIOD=0\nPERIOD=-3\nPERIOD=abc\n"));

    reporter.iterate().unwrap();

    assert_eq!(reporter.state().interval(), Duration::from_secs(1));
    assert_eq!(rig.log.lines().len(), 1, "only the emission is recorded");
    assert_eq!(reporter.summary().ignored, 3);
    assert_eq!(reporter.summary().commands, 0);
}

#[test]
fn scale_switches_the_next_report() {
    let (mut reporter, rig) = rig(ScriptedTransport::new().chunk(b"SCALE=C\n"));

    reporter.iterate().unwrap();
    reporter.iterate().unwrap();

    let sent = rig.wire.sent_lines();
    assert_eq!(sent[0], format!("12:00:00 {}", steady_reading(Unit::Fahrenheit)));
    assert_eq!(sent[1], format!("12:00:01 {}", steady_reading(Unit::Celsius)));
    assert_eq!(rig.log.count("SCALE=C"), 1);
}

#[test]
fn unknown_lines_are_silently_dropped() {
    let (mut reporter, rig) =
        rig(ScriptedTransport::new().chunk(b"start\nHELLO\n\nSCALE=K\nOFF \n"));

    reporter.iterate().unwrap();

    assert_eq!(reporter.loop_state(), LoopState::Running);
    assert_eq!(reporter.summary().ignored, 5);
    assert_eq!(rig.log.lines().len(), 1);
    assert_eq!(rig.wire.sent_lines().len(), 1, "nothing is echoed to the peer");
}

#[test]
fn crlf_terminated_commands_are_accepted() {
    let (mut reporter, rig) = rig(ScriptedTransport::new().chunk(b"SCALE=C\r\nSTOP\r\n"));

    reporter.iterate().unwrap();

    assert_eq!(reporter.loop_state(), LoopState::Paused);
    assert_eq!(reporter.state().unit(), Unit::Celsius);
    assert_eq!(rig.log.count("STOP"), 1);
}

#[test]
fn configuration_changes_are_accepted_while_paused() {
    let (mut reporter, rig) =
        rig(ScriptedTransport::new().chunk(b"STOP\n").chunk(b"PERIOD=4\nSCALE=C\n"));

    reporter.iterate().unwrap();
    reporter.iterate().unwrap();

    assert_eq!(reporter.loop_state(), LoopState::Paused);
    assert_eq!(reporter.state().interval(), Duration::from_secs(4));
    assert_eq!(reporter.state().unit(), Unit::Celsius);
    assert_eq!(rig.log.count("PERIOD=4"), 1);
    assert_eq!(rig.log.count("SCALE=C"), 1);
}

#[test]
fn lines_after_off_are_ignored() {
    let (mut reporter, rig) = rig(ScriptedTransport::new().chunk(b"OFF\nSTART\nPERIOD=3\n"));

    reporter.iterate().unwrap();

    assert_eq!(reporter.loop_state(), LoopState::Terminated);
    assert_eq!(reporter.state().interval(), Duration::from_secs(1));
    let tail: Vec<String> = rig.log.lines()[1..].iter().map(|l| l[9..].to_string()).collect();
    assert_eq!(tail, ["OFF", "SHUTDOWN"]);
    assert_eq!(reporter.summary().ignored, 2);
}

#[test]
fn log_is_recorded_verbatim_on_the_networked_channel() {
    let (mut reporter, rig) = rig_with(
        &networked_config(),
        ScriptedSensor::steady(512),
        ScriptedTransport::new().chunk(b"LOG operator  note \n"),
    );

    reporter.iterate().unwrap();

    assert_eq!(rig.log.lines()[1], "operator  note ");
    assert_eq!(rig.wire.sent_lines().len(), 1, "LOG is not mirrored");
}

#[test]
fn log_is_ignored_on_the_local_channel() {
    let (mut reporter, rig) = rig(ScriptedTransport::new().chunk(b"LOG operator note\n"));

    reporter.iterate().unwrap();

    assert_eq!(rig.log.lines().len(), 1);
    assert_eq!(reporter.summary().ignored, 1);
}

#[test]
fn dispatch_can_be_driven_directly() {
    let (mut reporter, rig) = rig(ScriptedTransport::new());

    reporter.dispatch(Command::Period(7)).unwrap();
    reporter.dispatch(Command::Stop).unwrap();
    reporter.dispatch(Command::Start).unwrap();

    assert_eq!(reporter.state().interval(), Duration::from_secs(7));
    assert_eq!(reporter.loop_state(), LoopState::Running);
    assert_eq!(
        rig.log.lines(),
        ["12:00:00 PERIOD=7", "12:00:00 STOP", "12:00:00 START"]
    );
}
