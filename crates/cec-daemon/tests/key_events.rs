//! Integration tests for remote-control key handling.
//!
//! Key presses go in through the adapter callbacks and come out as events on
//! the recording sink, so these tests cover the callback handler, the queue,
//! the supervisor dispatch and the key state machine as one path.

use std::sync::Arc;
use std::time::Duration;

use cec_core::{Command, InputKey, KeyMap, Keypress, UserControlCode};
use cec_daemon::application::command_queue::CommandQueue;
use cec_daemon::application::key_repeat::KeyValue;
use cec_daemon::application::supervisor::{
    AdapterDescriptor, HookError, HookRunner, Supervisor, SupervisorConfig,
};
use cec_daemon::infrastructure::cec_adapter::mock::{MockAdapter, ScriptedEvent};
use cec_daemon::infrastructure::input_sink::mock::{MockInputSink, SinkEvent};

struct NoHooks;

impl HookRunner for NoHooks {
    fn run(&self, _command: &str) -> Result<(), HookError> {
        Ok(())
    }
}

/// Runs one adapter cycle with `events` followed by `Exit` and returns what
/// the sink saw.
fn run_keys(events: Vec<ScriptedEvent>, sink: Arc<MockInputSink>) -> Vec<SinkEvent> {
    let adapter = MockAdapter::new(vec![AdapterDescriptor {
        path: "/sys/devices/usb1/1-2".to_string(),
        comm_port: "/dev/cec0".to_string(),
    }]);
    let queue = Arc::new(CommandQueue::new());
    adapter.attach_queue(Arc::clone(&queue));
    let mut script = events;
    script.push(ScriptedEvent::Push(Command::Exit));
    adapter.script(script);

    let mut supervisor = Supervisor::new(
        Box::new(adapter),
        queue,
        Arc::new(KeyMap::standard()),
        sink.clone(),
        Arc::new(NoHooks),
        SupervisorConfig::default(),
    );
    supervisor.run(None).unwrap();
    sink.events()
}

fn key(code: InputKey, value: KeyValue) -> SinkEvent {
    SinkEvent::Key(code, value)
}

#[test]
fn test_held_select_repeats_then_releases() {
    // Arrange
    let events = vec![
        ScriptedEvent::KeyPress(Keypress::down(UserControlCode::SELECT)),
        ScriptedEvent::KeyPress(Keypress::down(UserControlCode::SELECT)),
        ScriptedEvent::KeyPress(Keypress::released(
            UserControlCode::SELECT,
            Duration::from_millis(480),
        )),
    ];

    // Act
    let seen = run_keys(events, Arc::new(MockInputSink::new()));

    // Assert
    assert_eq!(
        seen,
        vec![
            key(InputKey::KEY_ENTER, KeyValue::Press),
            SinkEvent::Sync,
            key(InputKey::KEY_ENTER, KeyValue::Repeat),
            SinkEvent::Sync,
            key(InputKey::KEY_ENTER, KeyValue::Release),
            SinkEvent::Sync,
        ]
    );
}

#[test]
fn test_release_of_other_key_releases_held_key_first() {
    // Arrange: UP goes down but the TV reports the release of DOWN.
    let events = vec![
        ScriptedEvent::KeyPress(Keypress::down(UserControlCode::UP)),
        ScriptedEvent::KeyPress(Keypress::released(
            UserControlCode::DOWN,
            Duration::from_millis(120),
        )),
    ];

    // Act
    let seen = run_keys(events, Arc::new(MockInputSink::new()));

    // Assert
    assert_eq!(
        seen,
        vec![
            key(InputKey::KEY_UP, KeyValue::Press),
            SinkEvent::Sync,
            key(InputKey::KEY_UP, KeyValue::Release),
            SinkEvent::Sync,
            key(InputKey::KEY_DOWN, KeyValue::Press),
            SinkEvent::Sync,
            key(InputKey::KEY_DOWN, KeyValue::Release),
            SinkEvent::Sync,
        ]
    );
}

#[test]
fn test_chorded_key_is_released_when_daemon_exits() {
    // Arrange
    let events = vec![ScriptedEvent::KeyPress(Keypress::down(
        UserControlCode::LEFT_UP,
    ))];

    // Act
    let seen = run_keys(events, Arc::new(MockInputSink::new()));

    // Assert
    assert_eq!(
        seen,
        vec![
            key(InputKey::KEY_LEFT, KeyValue::Press),
            key(InputKey::KEY_UP, KeyValue::Press),
            SinkEvent::Sync,
            key(InputKey::KEY_LEFT, KeyValue::Release),
            key(InputKey::KEY_UP, KeyValue::Release),
            SinkEvent::Sync,
        ]
    );
}

#[test]
fn test_unmapped_button_produces_no_events() {
    let seen = run_keys(
        vec![ScriptedEvent::KeyPress(Keypress::down(
            UserControlCode::INPUT_SELECT,
        ))],
        Arc::new(MockInputSink::new()),
    );

    assert!(seen.is_empty());
}

#[test]
fn test_failing_sink_does_not_stop_the_daemon() {
    // Arrange
    let sink = Arc::new(MockInputSink::failing());

    // Act
    let seen = run_keys(
        vec![ScriptedEvent::KeyPress(Keypress::down(UserControlCode::UP))],
        Arc::clone(&sink),
    );

    // Assert: run_keys only returns once the run reached Exit.
    assert!(seen.is_empty());
}
