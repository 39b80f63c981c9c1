use crate::{
    rows::{JobViewModelBuilder, Row},
    schedules::{LatestLogs, SchedulesByJob, group_by_job},
    settings::SettingsResolver,
    topic::{Subscription, Topic},
};
use bkp_models::dtos::{Job, Log, OverviewSnapshot, Schedule};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Delimits a group of publishes that the overview applies as one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    Open,
    Closed,
}

/// The live collections the overview is derived from.
#[derive(Clone, Default)]
pub struct OverviewFeeds {
    pub jobs: Topic<Vec<Job>>,
    pub metadata_jobs: Topic<Vec<Job>>,
    pub schedules: Topic<Vec<Schedule>>,
    pub logs: Topic<Vec<Log>>,
    pub batch: Topic<Batch>,
}

impl OverviewFeeds {
    /// Runs `publish` so that the overview recomputes its rows at most once,
    /// after every collection published inside it is applied.
    pub fn publish_batch<F: FnOnce(&Self)>(&self, publish: F) {
        self.batch.publish(Batch::Open);
        publish(self);
        self.batch.publish(Batch::Closed);
    }

    pub fn publish_snapshot(&self, snapshot: OverviewSnapshot) {
        self.publish_batch(|feeds| {
            feeds.jobs.publish(snapshot.jobs);
            feeds.metadata_jobs.publish(snapshot.metadata_jobs);
            feeds.schedules.publish(snapshot.schedules);
            feeds.logs.publish(snapshot.logs);
        });
    }
}

#[derive(Default)]
struct OverviewState {
    jobs: Arc<Vec<Job>>,
    metadata_jobs: Arc<Vec<Job>>,
    schedules_by_job: SchedulesByJob,
    latest_logs: LatestLogs,
    held: bool,
    dirty: bool,
}

struct Recompute {
    state: Mutex<OverviewState>,
    resolver: Arc<SettingsResolver>,
    rows: Topic<Vec<Row>>,
}

impl Recompute {
    fn lock(&self) -> MutexGuard<'_, OverviewState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &mut OverviewState) {
        state.dirty = false;
        let rows = JobViewModelBuilder::new(&self.resolver).build_rows(
            &state.jobs,
            &state.metadata_jobs,
            &state.schedules_by_job,
            &state.latest_logs,
        );
        debug!("overview recomputed with {} rows", rows.len());
        self.rows.publish(rows);
    }

    fn update<F: FnOnce(&mut OverviewState)>(&self, change: F) {
        let mut state = self.lock();
        change(&mut state);
        if state.held {
            state.dirty = true;
        } else {
            self.publish(&mut state);
        }
    }

    fn hold(&self) {
        self.lock().held = true;
    }

    fn release(&self) {
        let mut state = self.lock();
        state.held = false;
        if state.dirty {
            self.publish(&mut state);
        }
    }
}

/// Rows of the overview table, recomputed whenever any of the feeds
/// publishes. The subscriptions to the feeds end when the overview is
/// dropped.
pub struct Overview {
    rows: Topic<Vec<Row>>,
    _subscriptions: Vec<Subscription>,
}

impl Overview {
    pub fn new(feeds: &OverviewFeeds, resolver: Arc<SettingsResolver>) -> Self {
        let rows = Topic::new();
        let recompute = Arc::new(Recompute {
            state: Mutex::new(OverviewState {
                held: true,
                ..Default::default()
            }),
            resolver,
            rows: rows.clone(),
        });

        let subscriptions = vec![
            {
                let recompute = Arc::clone(&recompute);
                feeds.jobs.subscribe(move |jobs| {
                    recompute.update(|state| state.jobs = Arc::clone(jobs))
                })
            },
            {
                let recompute = Arc::clone(&recompute);
                feeds.metadata_jobs.subscribe(move |jobs| {
                    recompute.update(|state| state.metadata_jobs = Arc::clone(jobs))
                })
            },
            {
                let recompute = Arc::clone(&recompute);
                feeds.schedules.subscribe(move |schedules| {
                    recompute.update(|state| state.schedules_by_job = group_by_job(schedules))
                })
            },
            {
                let recompute = Arc::clone(&recompute);
                feeds.logs.subscribe(move |logs| {
                    recompute.update(|state| state.latest_logs = LatestLogs::index(logs))
                })
            },
            {
                let recompute = Arc::clone(&recompute);
                feeds.batch.subscribe(move |batch| match **batch {
                    Batch::Open => recompute.hold(),
                    Batch::Closed => recompute.release(),
                })
            },
        ];
        // Values replayed on subscribe are applied as a single update.
        recompute.release();

        Self {
            rows,
            _subscriptions: subscriptions,
        }
    }

    pub fn rows(&self) -> &Topic<Vec<Row>> {
        &self.rows
    }

    pub fn current_rows(&self) -> Arc<Vec<Row>> {
        self.rows.current().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bkp_models::dtos::JobType;

    fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            name: id.to_string(),
            ..Default::default()
        }
    }

    fn schedule(id: &str, job_id: &str) -> Schedule {
        Schedule {
            id: id.to_string(),
            job_id: job_id.to_string(),
            ..Default::default()
        }
    }

    fn log(id: &str, schedule_id: &str, start: i64) -> Log {
        Log {
            id: id.to_string(),
            schedule_id: Some(schedule_id.to_string()),
            start,
            ..Default::default()
        }
    }

    #[test]
    fn rows_are_empty_before_any_publish() {
        let feeds = OverviewFeeds::default();
        let overview = Overview::new(&feeds, Arc::default());
        assert!(overview.current_rows().is_empty());
    }

    #[test]
    fn any_feed_triggers_a_recompute() {
        let feeds = OverviewFeeds::default();
        let overview = Overview::new(&feeds, Arc::default());

        feeds.jobs.publish(vec![job("job-1")]);
        assert_eq!(overview.current_rows().len(), 1);
        assert!(overview.current_rows()[0].schedules.is_empty());

        feeds.schedules.publish(vec![schedule("s1", "job-1"), schedule("s2", "other")]);
        assert_eq!(overview.current_rows()[0].schedules.len(), 1);

        feeds.logs.publish(vec![log("run-1", "s1", 1), log("run-2", "s1", 2)]);
        let rows = overview.current_rows();
        let last_run = rows[0].schedules[0].last_run.as_ref().map(|l| l.id.clone());
        assert_eq!(last_run, Some("run-2".to_string()));

        let mut metadata = job("meta-1");
        metadata.job_type = JobType::MetadataBackup;
        feeds.metadata_jobs.publish(vec![metadata]);
        let ids = overview
            .current_rows()
            .iter()
            .map(|r| r.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["job-1", "meta-1"]);
    }

    #[test]
    fn feeds_published_before_creation_are_used() {
        let feeds = OverviewFeeds::default();
        feeds.publish_snapshot(OverviewSnapshot {
            jobs: vec![job("a"), job("b")],
            schedules: vec![schedule("s1", "b")],
            ..Default::default()
        });

        let overview = Overview::new(&feeds, Arc::default());
        let rows = overview.current_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].schedules.len(), 1);
    }

    #[test]
    fn snapshot_is_applied_as_one_update() {
        let feeds = OverviewFeeds::default();
        let overview = Overview::new(&feeds, Arc::default());
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let _subscription = overview.rows().subscribe(move |rows| {
            let schedules = rows.iter().map(|r| r.schedules.len()).collect::<Vec<_>>();
            sink.lock().unwrap().push(schedules);
        });

        feeds.publish_snapshot(OverviewSnapshot {
            jobs: vec![job("job-1")],
            schedules: vec![schedule("s1", "job-1")],
            ..Default::default()
        });

        assert_eq!(*seen.lock().unwrap(), vec![vec![1]]);
    }

    #[test]
    fn replayed_feeds_are_applied_as_one_update() {
        let feeds = OverviewFeeds::default();
        feeds.jobs.publish(vec![job("job-1")]);
        feeds.schedules.publish(vec![schedule("s1", "job-1")]);

        let overview = Overview::new(&feeds, Arc::default());
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let _subscription = overview.rows().subscribe(move |_| *sink.lock().unwrap() += 1);

        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(overview.current_rows()[0].schedules.len(), 1);
    }

    #[test]
    fn dropping_the_overview_unsubscribes() {
        let feeds = OverviewFeeds::default();
        let overview = Overview::new(&feeds, Arc::default());
        assert_eq!(feeds.jobs.subscriber_count(), 1);

        drop(overview);
        assert_eq!(feeds.jobs.subscriber_count(), 0);
        assert_eq!(feeds.logs.subscriber_count(), 0);
    }
}
