use crate::entities::SequentialIds;
use crate::events::{EcsEvent, EventKind};
use crate::scheduler::RunState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use crate::config::EcsConfig;
use crate::EcsContext;
use std::cell::RefCell;
use std::sync::Arc;
use std::rc::Rc;
use std::thread;

fn context(config: EcsConfig) -> EcsContext {
	EcsContext::with_id_generator(config, SequentialIds::default()).unwrap()
}

fn record_run_events(ecs: &mut EcsContext) -> Rc<RefCell<Vec<EventKind>>> {
	let kinds = Rc::new(RefCell::new(Vec::new()));
	let sink = kinds.clone();
	ecs.on_any(move |event| {
		if matches!(event, EcsEvent::Run | EcsEvent::Pause | EcsEvent::Stop | EcsEvent::AfterTick { .. }) {
			sink.borrow_mut().push(event.kind());
		}
	});
	kinds
}

#[test]
pub fn run_ticks_stops_on_its_own() {
	let mut ecs = context(EcsConfig::default());
	let kinds = record_run_events(&mut ecs);

	assert_eq!(ecs.run_ticks(3), 3);
	assert_eq!(ecs.run_state(), RunState::Stopped);
	assert_eq!(
		kinds.borrow().as_slice(),
		[
			EventKind::Run,
			EventKind::AfterTick,
			EventKind::AfterTick,
			EventKind::AfterTick,
			EventKind::Stop
		]
	);
}

#[test]
pub fn run_ticks_zero_does_nothing() {
	let mut ecs = context(EcsConfig::default());
	let kinds = record_run_events(&mut ecs);

	assert_eq!(ecs.run_ticks(0), 0);
	assert!(kinds.borrow().is_empty());
}

#[test]
pub fn listener_can_stop_the_loop() {
	let mut ecs = context(EcsConfig::default());
	let handle = ecs.run_handle();
	let mut seen = 0;
	ecs.on(EventKind::AfterTick, move |_| {
		seen += 1;
		if seen == 5 {
			handle.stop();
		}
	});
	let kinds = record_run_events(&mut ecs);

	assert_eq!(ecs.run(), 5);
	assert_eq!(ecs.run_state(), RunState::Stopped);
	assert_eq!(kinds.borrow().last(), Some(&EventKind::Stop));
}

#[test]
pub fn pause_and_resume_from_another_thread() {
	let mut ecs = context(EcsConfig::default());
	let ticks = Arc::new(AtomicUsize::new(0));
	let counter = ticks.clone();
	ecs.on(EventKind::AfterTick, move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
	});
	let kinds = record_run_events(&mut ecs);

	let handle = ecs.run_handle();
	let controller = thread::spawn(move || {
		let wait_for = |target: usize| {
			while ticks.load(Ordering::SeqCst) < target {
				thread::sleep(Duration::from_millis(1));
			}
		};

		wait_for(3);
		assert!(handle.pause());
		assert!(!handle.pause(), "Pausing twice changes nothing");
		thread::sleep(Duration::from_millis(10));

		let paused_at = ticks.load(Ordering::SeqCst);
		thread::sleep(Duration::from_millis(30));
		assert_eq!(ticks.load(Ordering::SeqCst), paused_at, "A paused loop must not tick");

		assert!(handle.resume());
		wait_for(paused_at + 3);
		assert!(handle.stop());
	});

	let ran = ecs.run();
	controller.join().unwrap();

	assert!(ran >= 6);
	assert_eq!(ecs.run_state(), RunState::Stopped);

	let transitions = kinds
		.borrow()
		.iter()
		.copied()
		.filter(|kind| *kind != EventKind::AfterTick)
		.collect::<Vec<_>>();
	assert_eq!(
		transitions,
		[EventKind::Run, EventKind::Pause, EventKind::Run, EventKind::Stop]
	);
}

#[test]
pub fn limited_tick_rate_spaces_ticks_out() {
	let config = EcsConfig {
		tick_rate: 200.0,
		limit_tick_rate: true,
		..EcsConfig::default()
	};
	let mut ecs = context(config);

	let started = Instant::now();
	assert_eq!(ecs.run_ticks(5), 5);
	assert!(
		started.elapsed() >= Duration::from_millis(20),
		"Five ticks at 200Hz span at least four intervals, took {:?}",
		started.elapsed()
	);
}

#[test]
pub fn transitions_from_stopped_are_rejected() {
	let mut ecs = context(EcsConfig::default());
	let kinds = record_run_events(&mut ecs);

	assert!(!ecs.pause());
	assert!(!ecs.stop());
	assert_eq!(ecs.run_state(), RunState::Stopped);
	assert!(kinds.borrow().is_empty());
}

#[test]
pub fn tick_works_in_any_state() {
	let mut ecs = context(EcsConfig::default());
	let handle = ecs.run_handle();

	assert_eq!(ecs.run_state(), RunState::Stopped);
	ecs.tick();

	handle.run();
	assert!(handle.is_running());
	assert!(ecs.pause());
	assert!(!handle.is_running());
	assert_eq!(ecs.run_state(), RunState::Paused);
	ecs.tick();
	assert!(ecs.stop());
}
