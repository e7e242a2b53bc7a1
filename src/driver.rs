//! Live refresh of the age and countdown while a birth date is set.
//!
//! The driver is either idle or owns exactly one periodic task for the
//! current birth date. Every way out of the active state (a new birth date,
//! `clear`, `shutdown`, drop) cancels that task before anything else starts.
//! Results are published on a `watch` channel, so a new snapshot always
//! replaces the previous one as a whole.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::age::{AgeBreakdown, AgeError, compute_age};
use crate::birthday::{BirthdayCountdown, is_birthday, next_birthday};
use crate::clock::Clock;

/// Output of one recalculation, taken against a single sample of "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub birth_date: NaiveDate,
    pub taken_at: NaiveDateTime,
    pub age: Result<AgeBreakdown, AgeError>,
    pub countdown: BirthdayCountdown,
    pub birthday_today: bool,
}

impl Snapshot {
    pub fn take(birth_date: NaiveDate, now: NaiveDateTime) -> Self {
        Self {
            birth_date,
            taken_at: now,
            age: compute_age(birth_date, now),
            countdown: next_birthday(birth_date, now),
            birthday_today: is_birthday(birth_date, now.date()),
        }
    }
}

/// Samples, computes and publishes one snapshot at a time.
///
/// The periodic task and `submit` share it; holding `gate` from the clock
/// sample to the send keeps publications in sampling order.
struct Recalculator {
    clock: Arc<dyn Clock>,
    tx: watch::Sender<Option<Snapshot>>,
    gate: Mutex<()>,
}

impl Recalculator {
    fn refresh(&self, birth_date: NaiveDate) -> Snapshot {
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = Snapshot::take(birth_date, self.clock.now());
        self.tx.send_replace(Some(snapshot.clone()));
        snapshot
    }

    fn withdraw(&self) {
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        self.tx.send_replace(None);
    }
}

enum State {
    Idle,
    Active {
        birth_date: NaiveDate,
        task: JoinHandle<()>,
    },
}

pub struct LiveRefreshDriver {
    recalc: Arc<Recalculator>,
    interval: Duration,
    state: State,
}

impl LiveRefreshDriver {
    pub fn new(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            recalc: Arc::new(Recalculator {
                clock,
                tx,
                gate: Mutex::new(()),
            }),
            interval,
            state: State::Idle,
        }
    }

    /// Receives the latest snapshot; `None` while no birth date is set.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.recalc.tx.subscribe()
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        match &self.state {
            State::Idle => None,
            State::Active { birth_date, .. } => Some(*birth_date),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// Starts refreshing for `birth_date`, replacing any previous cycle.
    ///
    /// The first periodic refresh happens one interval from now; call
    /// [`submit`](Self::submit) for an immediate one.
    pub async fn set_birth_date(&mut self, birth_date: NaiveDate) {
        if self.birth_date() == Some(birth_date) {
            debug!(%birth_date, "birth date unchanged, keeping refresh cycle");
            return;
        }

        self.stop().await;

        let recalc = Arc::clone(&self.recalc);
        let period = self.interval;
        let start = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let snapshot = recalc.refresh(birth_date);
                debug!(%birth_date, taken_at = %snapshot.taken_at, "periodic refresh");
            }
        });

        info!(%birth_date, interval_ms = period.as_millis() as u64, "refresh cycle started");
        self.state = State::Active { birth_date, task };
    }

    /// Stops refreshing and withdraws the last snapshot.
    pub async fn clear(&mut self) {
        self.stop().await;
        self.recalc.withdraw();
    }

    /// Recalculates right away, outside the periodic cadence.
    ///
    /// Does nothing while idle.
    pub fn submit(&self) -> Option<Snapshot> {
        let birth_date = self.birth_date()?;
        let snapshot = self.recalc.refresh(birth_date);
        debug!(%birth_date, taken_at = %snapshot.taken_at, "refresh on submit");
        Some(snapshot)
    }

    /// Stops the refresh cycle and waits until its task is gone.
    pub async fn shutdown(mut self) {
        self.stop().await;
    }

    async fn stop(&mut self) {
        let state = std::mem::replace(&mut self.state, State::Idle);
        if let State::Active { birth_date, task } = state {
            task.abort();
            // Err(cancelled) is expected here.
            let _ = task.await;
            info!(%birth_date, "refresh cycle stopped");
        }
    }
}

impl Drop for LiveRefreshDriver {
    fn drop(&mut self) {
        if let State::Active { task, .. } = &self.state {
            task.abort();
        }
    }
}
