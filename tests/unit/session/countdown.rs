use super::*;

async fn drain(mut c: Countdown) -> Vec<(CountdownEvent, Duration)> {
    let t0 = Instant::now();
    let mut out = Vec::new();
    while let Some(ev) = c.next().await {
        out.push((ev, t0.elapsed()));
    }
    out
}

#[tokio::test(start_paused = true)]
async fn three_second_countdown_ticks_once_per_second() {
    let events = drain(Countdown::start(3)).await;
    assert_eq!(
        events,
        vec![
            (CountdownEvent::Tick(3), Duration::from_secs(0)),
            (CountdownEvent::Tick(2), Duration::from_secs(1)),
            (CountdownEvent::Tick(1), Duration::from_secs(2)),
            (CountdownEvent::Complete, Duration::from_secs(3)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn emits_duration_distinct_ticks_before_completing() {
    for d in [1u32, 2, 5, 10] {
        let events = drain(Countdown::start(d)).await;
        let ticks = events
            .iter()
            .filter_map(|(e, _)| match e {
                CountdownEvent::Tick(n) => Some(*n),
                CountdownEvent::Complete => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(ticks, (1..=d).rev().collect::<Vec<_>>());
        assert_eq!(events.last().map(|(e, _)| *e), Some(CountdownEvent::Complete));
    }
}

#[tokio::test(start_paused = true)]
async fn zero_duration_completes_immediately() {
    let events = drain(Countdown::start(0)).await;
    assert_eq!(events, vec![(CountdownEvent::Complete, Duration::ZERO)]);
}

#[tokio::test(start_paused = true)]
async fn not_restartable_after_completion() {
    let mut c = Countdown::start(1);
    assert_eq!(c.next().await, Some(CountdownEvent::Tick(1)));
    assert_eq!(c.next().await, Some(CountdownEvent::Complete));
    assert!(c.is_finished());
    assert_eq!(c.next().await, None);
    assert_eq!(c.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn dropped_wait_does_not_advance() {
    let mut c = Countdown::start(3);
    assert_eq!(c.next().await, Some(CountdownEvent::Tick(3)));

    // Abandon the wait for Tick(2) halfway through.
    let _ = tokio::time::timeout(Duration::from_millis(500), c.next()).await;
    assert_eq!(c.remaining(), 2);

    // The schedule stays anchored to the start instant.
    let t = Instant::now();
    assert_eq!(c.next().await, Some(CountdownEvent::Tick(2)));
    assert_eq!(t.elapsed(), Duration::from_millis(500));
}
