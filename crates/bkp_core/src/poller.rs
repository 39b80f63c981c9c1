use crate::{backend::BackupBackend, overview::OverviewFeeds, topic::Topic};
use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, error};

fn publish_if_changed<T>(name: &str, topic: &Topic<Vec<T>>, fetched: Result<Vec<T>>)
where
    T: PartialEq + Send + Sync + 'static,
{
    match fetched {
        Ok(values) => {
            if topic.current().is_some_and(|current| *current == values) {
                debug!("{name} unchanged");
                return;
            }
            debug!("publishing {} {name}", values.len());
            topic.publish(values);
        }
        Err(e) => error!("unable to fetch {name}: {e}"),
    }
}

/// Fetches the collections of the overview from the backend at a fixed
/// interval and publishes every one that changed.
pub struct Poller {
    backend: Arc<dyn BackupBackend>,
    feeds: OverviewFeeds,
    period: Duration,
}

impl Poller {
    pub fn new(backend: Arc<dyn BackupBackend>, feeds: OverviewFeeds, period: Duration) -> Self {
        Self {
            backend,
            feeds,
            period,
        }
    }

    pub async fn poll_once(&self) {
        let (jobs, metadata_jobs, schedules, logs) = tokio::join!(
            self.backend.backup_jobs(),
            self.backend.metadata_backup_jobs(),
            self.backend.schedules(),
            self.backend.backup_logs(),
        );
        self.feeds.publish_batch(|feeds| {
            publish_if_changed("backup jobs", &feeds.jobs, jobs);
            publish_if_changed("metadata backup jobs", &feeds.metadata_jobs, metadata_jobs);
            publish_if_changed("schedules", &feeds.schedules, schedules);
            publish_if_changed("logs", &feeds.logs, logs);
        });
    }

    pub async fn run(self) {
        let mut ticks = interval(self.period);
        loop {
            ticks.tick().await;
            self.poll_once().await;
        }
    }

    /// Runs the poller on the current runtime until the handle is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overview::Overview;
    use anyhow::{anyhow, bail};
    use async_trait::async_trait;
    use bkp_models::dtos::{DeleteJobsRequest, Job, Log, RunJobRequest, Schedule};
    use std::sync::Mutex;

    #[derive(Default)]
    struct SequenceBackend {
        jobs: Mutex<Vec<Result<Vec<Job>>>>,
        schedules: Vec<Schedule>,
    }

    #[async_trait]
    impl BackupBackend for SequenceBackend {
        async fn backup_jobs(&self) -> Result<Vec<Job>> {
            let mut jobs = self.jobs.lock().unwrap();
            if jobs.is_empty() {
                bail!("no more answers");
            }
            jobs.remove(0)
        }

        async fn metadata_backup_jobs(&self) -> Result<Vec<Job>> {
            Ok(vec![])
        }

        async fn schedules(&self) -> Result<Vec<Schedule>> {
            Ok(self.schedules.clone())
        }

        async fn backup_logs(&self) -> Result<Vec<Log>> {
            Err(anyhow!("logs unavailable"))
        }

        async fn run_backup_job(&self, _: &RunJobRequest) -> Result<()> {
            Ok(())
        }

        async fn run_metadata_backup_job(&self, _: &RunJobRequest) -> Result<()> {
            Ok(())
        }

        async fn cancel_job(&self, _: &Job) -> Result<()> {
            Ok(())
        }

        async fn delete_backup_jobs(&self, _: &DeleteJobsRequest) -> Result<()> {
            Ok(())
        }

        async fn enable_schedule(&self, _: &str) -> Result<()> {
            Ok(())
        }

        async fn disable_schedule(&self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn only_changed_collections_are_published() {
        let backend = SequenceBackend {
            jobs: Mutex::new(vec![
                Ok(vec![job("a")]),
                Ok(vec![job("a")]),
                Ok(vec![job("a"), job("b")]),
            ]),
            ..Default::default()
        };
        let feeds = OverviewFeeds::default();
        let publishes = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&publishes);
        let _subscription = feeds.jobs.subscribe(move |_| *counter.lock().unwrap() += 1);

        let poller = Poller::new(Arc::new(backend), feeds.clone(), Duration::from_secs(5));
        poller.poll_once().await;
        poller.poll_once().await;
        poller.poll_once().await;

        assert_eq!(*publishes.lock().unwrap(), 2);
        assert_eq!(feeds.jobs.current().map(|j| j.len()), Some(2));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_snapshot() {
        let backend = SequenceBackend {
            jobs: Mutex::new(vec![Ok(vec![job("a")])]),
            ..Default::default()
        };
        let feeds = OverviewFeeds::default();
        let poller = Poller::new(Arc::new(backend), feeds.clone(), Duration::from_secs(5));

        poller.poll_once().await;
        poller.poll_once().await;

        assert_eq!(feeds.jobs.current().map(|j| j[0].id.clone()), Some("a".to_string()));
        assert!(feeds.logs.current().is_none());
        assert_eq!(feeds.schedules.current().map(|s| s.len()), Some(0));
    }

    #[tokio::test]
    async fn one_tick_recomputes_the_overview_once() {
        let backend = SequenceBackend {
            jobs: Mutex::new(vec![Ok(vec![job("j1")]), Ok(vec![job("j1")])]),
            schedules: vec![Schedule {
                id: "s1".to_string(),
                job_id: "j1".to_string(),
                ..Default::default()
            }],
        };
        let feeds = OverviewFeeds::default();
        let overview = Overview::new(&feeds, Arc::default());
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        let _subscription = overview.rows().subscribe(move |rows| {
            let schedules = rows.iter().map(|r| r.schedules.len()).collect::<Vec<_>>();
            sink.lock().unwrap().push(schedules);
        });

        let poller = Poller::new(Arc::new(backend), feeds, Duration::from_secs(5));
        poller.poll_once().await;
        assert_eq!(*seen.lock().unwrap(), vec![vec![1]]);

        poller.poll_once().await;
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
