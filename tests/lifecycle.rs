use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tinyworkers::{
    Config, EventKind, ExitReason, Factory, JobFn, JobRef, Observe, TaskError, Worker, WorkerEvent,
    create_batch,
};

#[derive(Default)]
struct Tally {
    counter: u32,
    stamps: Vec<Instant>,
    trace: Vec<&'static str>,
}

fn fast() -> Config {
    Config {
        idle: Duration::from_millis(2),
        ..Config::default()
    }
}

fn count_to(limit: u32) -> JobRef<Tally> {
    JobFn::arc(move |worker: &Worker<Tally>, state: &mut Tally| {
        Box::pin(async move {
            assert!(worker.is_running());
            state.counter += 1;
            state.stamps.push(Instant::now());
            state.trace.push("action");
            if state.counter >= limit {
                worker.stop();
            }
            Ok::<_, TaskError>(())
        })
    })
}

fn traced_wait() -> JobRef<Tally> {
    JobFn::arc(|_worker: &Worker<Tally>, state: &mut Tally| {
        Box::pin(async move {
            state.trace.push("wait");
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<_, TaskError>(())
        })
    })
}

#[tokio::test]
async fn batch_of_three_stops_at_five() {
    let workers = create_batch(3, count_to(5));
    let stopped: Arc<Mutex<Vec<(String, u32)>>> = Arc::new(Mutex::new(Vec::new()));

    for w in &workers {
        let log = Arc::clone(&stopped);
        w.on_stopped(move |ev| {
            log.lock()
                .unwrap()
                .push((ev.id().to_string(), ev.state.counter));
        });
        assert_eq!(w.start(), Ok(true));
    }

    for w in &workers {
        tokio::time::timeout(Duration::from_secs(5), w.wait_stopped())
            .await
            .expect("worker should stop itself");
    }

    let stopped = stopped.lock().unwrap();
    assert_eq!(stopped.len(), 3);
    let by_id: HashMap<&str, u32> = stopped.iter().map(|(id, n)| (id.as_str(), *n)).collect();
    assert_eq!(by_id.len(), 3);
    for id in ["0", "1", "2"] {
        assert_eq!(by_id[id], 5);
    }
    assert!(stopped.iter().all(|(_, n)| *n <= 5));
    for w in &workers {
        assert_eq!(w.with_state(|s| s.stamps.len()).unwrap(), 5);
        assert_eq!(w.cycles(), 5);
    }
}

#[tokio::test]
async fn started_fires_once_before_first_action() {
    let worker = Worker::builder("w", count_to(3), Tally::default())
        .with_config(fast())
        .build();
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let l = Arc::clone(&log);
    worker.on_started(move |ev| {
        l.lock().unwrap().push(format!(
            "started:{}:{}:{}",
            ev.state.counter,
            ev.cycles,
            ev.worker.is_running()
        ));
    });
    let l = Arc::clone(&log);
    worker.on_stopped(move |ev| {
        l.lock().unwrap().push(format!(
            "stopped:{}:{}:{}",
            ev.state.counter,
            ev.cycles,
            ev.worker.is_running()
        ));
    });

    worker.start().unwrap();
    worker.wait_stopped().await;

    assert_eq!(
        *log.lock().unwrap(),
        ["started:0:0:true", "stopped:3:3:false"]
    );
}

#[tokio::test]
async fn action_and_wait_alternate() {
    let worker = Worker::builder("w", count_to(4), Tally::default())
        .with_wait(traced_wait())
        .build();

    worker.start().unwrap();
    worker.wait_stopped().await;

    let trace = worker.with_state(|s| s.trace.clone()).unwrap();
    assert_eq!(
        trace,
        ["action", "wait", "action", "wait", "action", "wait", "action"]
    );
}

#[tokio::test]
async fn restart_after_stop_is_noop() {
    let worker = Worker::builder("w", count_to(2), Tally::default())
        .with_config(fast())
        .build();
    let started = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&started);
    worker.on_started(move |_| {
        s.fetch_add(1, Ordering::SeqCst);
    });

    worker.start().unwrap();
    worker.wait_stopped().await;

    assert_eq!(worker.start(), Ok(false));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!worker.is_running());
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(worker.with_state(|s| s.counter).unwrap(), 2);
}

#[tokio::test]
async fn double_stop_fires_stopped_once() {
    let worker = Worker::builder("w", count_to(u32::MAX), Tally::default())
        .with_config(fast())
        .build();
    let stopped = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&stopped);
    worker.on_stopped(move |_| {
        s.fetch_add(1, Ordering::SeqCst);
    });

    worker.start().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    worker.stop();
    worker.stop();
    worker.stop_and_wait(Duration::from_secs(2)).await.unwrap();
    worker.stop();

    assert_eq!(stopped.load(Ordering::SeqCst), 1);
    assert_eq!(worker.exit_reason(), Some(ExitReason::Cancelled));
}

#[tokio::test]
async fn fault_in_one_worker_leaves_siblings_running() {
    let action: JobRef<Tally> = JobFn::arc(|worker: &Worker<Tally>, state: &mut Tally| {
        Box::pin(async move {
            state.counter += 1;
            if worker.id() == "1" && state.counter == 2 {
                return Err(TaskError::fail("bad input"));
            }
            Ok(())
        })
    });
    let workers = Factory::new(action).with_config(fast()).create(3);
    for w in &workers {
        w.start().unwrap();
    }

    workers[1].wait_stopped().await;
    assert_eq!(
        workers[1].exit_reason().and_then(|e| e.fault().cloned()),
        Some(TaskError::fail("bad input"))
    );
    assert!(workers[0].is_running());
    assert!(workers[2].is_running());

    for w in [&workers[0], &workers[2]] {
        w.stop_and_wait(Duration::from_secs(2)).await.unwrap();
        assert_eq!(w.exit_reason(), Some(ExitReason::Cancelled));
    }
}

struct Recorder {
    tag: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Observe<Tally> for Recorder {
    fn on_event(&self, event: &WorkerEvent<'_, Tally>) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.tag, event.kind.as_label()));
    }

    fn name(&self) -> &'static str {
        self.tag
    }
}

struct Explodes;

impl Observe<Tally> for Explodes {
    fn on_event(&self, event: &WorkerEvent<'_, Tally>) {
        if event.kind == EventKind::Started {
            panic!("observer bug");
        }
    }
}

#[tokio::test]
async fn observers_run_in_order_and_survive_panics() {
    let worker = Worker::builder("w", count_to(1), Tally::default())
        .with_config(fast())
        .build();
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    worker.subscribe(Arc::new(Recorder {
        tag: "first",
        log: Arc::clone(&log),
    }));
    worker.subscribe(Arc::new(Explodes));
    worker.subscribe(Arc::new(Recorder {
        tag: "second",
        log: Arc::clone(&log),
    }));

    worker.start().unwrap();
    worker.wait_stopped().await;

    assert_eq!(
        *log.lock().unwrap(),
        [
            "first:started",
            "second:started",
            "first:stopped",
            "second:stopped"
        ]
    );
    assert_eq!(worker.exit_reason(), Some(ExitReason::Cancelled));
}

#[tokio::test]
async fn event_sequence_numbers_increase() {
    let worker = Worker::builder("w", count_to(2), Tally::default())
        .with_config(fast())
        .build();
    let seqs: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seqs);
    worker.on_event(move |ev| {
        s.lock().unwrap().push(ev.seq);
    });

    worker.start().unwrap();
    worker.wait_stopped().await;

    let seqs = seqs.lock().unwrap();
    assert_eq!(seqs.len(), 2);
    assert!(seqs[0] < seqs[1]);
}

#[tokio::test]
async fn custom_wait_can_end_early_on_stop() {
    let wait: JobRef<Tally> = JobFn::arc(|worker: &Worker<Tally>, _state: &mut Tally| {
        Box::pin(async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(30)) => {}
                _ = worker.cancelled() => {}
            }
            Ok::<_, TaskError>(())
        })
    });
    let worker = Worker::builder("w", count_to(u32::MAX), Tally::default())
        .with_wait(wait)
        .build();

    worker.start().unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    worker
        .stop_and_wait(Duration::from_secs(1))
        .await
        .expect("cancellable wait should end promptly");
    assert_eq!(worker.with_state(|s| s.counter).unwrap(), 1);
}
