use bkp_models::dtos::{Log, Schedule};
use std::collections::HashMap;

pub type SchedulesByJob = HashMap<String, Vec<Schedule>>;

/// Groups schedules by the id of the job they belong to, keeping the order of
/// `schedules` inside every group.
pub fn group_by_job(schedules: &[Schedule]) -> SchedulesByJob {
    let mut groups = SchedulesByJob::new();
    for schedule in schedules {
        groups
            .entry(schedule.job_id.clone())
            .or_default()
            .push(schedule.clone());
    }
    groups
}

// Most recent start wins; on equal starts the greatest id wins.
fn is_more_recent(candidate: &Log, current: &Log) -> bool {
    (candidate.start, &candidate.id) > (current.start, &current.id)
}

/// The most recent log of `schedule_id`, if any.
pub fn latest_log_for<'a>(schedule_id: &str, logs: &'a [Log]) -> Option<&'a Log> {
    logs.iter()
        .filter(|log| log.belongs_to(schedule_id))
        .fold(None, |latest: Option<&Log>, log| match latest {
            Some(current) if !is_more_recent(log, current) => Some(current),
            _ => Some(log),
        })
}

/// The most recent log of every schedule, computed in a single pass over a
/// log collection.
#[derive(Debug, Clone, Default)]
pub struct LatestLogs(HashMap<String, Log>);

impl LatestLogs {
    pub fn index(logs: &[Log]) -> Self {
        let mut latest: HashMap<String, Log> = HashMap::new();
        for log in logs {
            let Some(schedule_id) = &log.schedule_id else {
                continue;
            };
            match latest.get(schedule_id) {
                Some(current) if !is_more_recent(log, current) => {}
                _ => {
                    latest.insert(schedule_id.clone(), log.clone());
                }
            }
        }
        Self(latest)
    }

    pub fn get(&self, schedule_id: &str) -> Option<&Log> {
        self.0.get(schedule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(id: &str, job_id: &str) -> Schedule {
        Schedule {
            id: id.to_string(),
            job_id: job_id.to_string(),
            cron: "0 0 * * *".to_string(),
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
    fn schedules_are_grouped_in_input_order() {
        let groups = group_by_job(&[
            schedule("s1", "j1"),
            schedule("s2", "j1"),
            schedule("s3", "j2"),
        ]);

        let ids = |job: &str| {
            groups[job]
                .iter()
                .map(|s| s.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(ids("j1"), vec!["s1", "s2"]);
        assert_eq!(ids("j2"), vec!["s3"]);
    }

    #[test]
    fn latest_log_has_greatest_start() {
        let logs = vec![log("a", "s1", 10), log("b", "s1", 30), log("c", "s1", 20)];
        assert_eq!(latest_log_for("s1", &logs).map(|l| l.start), Some(30));
    }

    #[test]
    fn latest_log_ignores_other_schedules() {
        let logs = vec![log("a", "s1", 10), log("b", "s2", 30)];
        assert_eq!(latest_log_for("s1", &logs).map(|l| l.id.as_str()), Some("a"));
        assert!(latest_log_for("s3", &logs).is_none());
        assert!(latest_log_for("s1", &[]).is_none());
    }

    #[test]
    fn ties_are_broken_by_greatest_id() {
        let logs = vec![log("run-b", "s1", 30), log("run-c", "s1", 30), log("run-a", "s1", 30)];
        assert_eq!(
            latest_log_for("s1", &logs).map(|l| l.id.as_str()),
            Some("run-c")
        );
        assert_eq!(
            LatestLogs::index(&logs).get("s1").map(|l| l.id.as_str()),
            Some("run-c")
        );
    }

    #[test]
    fn index_matches_linear_scan() {
        let mut logs = vec![
            log("a", "s1", 10),
            log("b", "s2", 5),
            log("c", "s1", 40),
            log("d", "s2", 50),
            log("e", "s1", 20),
        ];
        logs.push(Log {
            id: "orphan".to_string(),
            start: 100,
            ..Default::default()
        });

        let index = LatestLogs::index(&logs);
        assert_eq!(index.0.len(), 2);
        for schedule_id in ["s1", "s2"] {
            assert_eq!(index.get(schedule_id), latest_log_for(schedule_id, &logs));
        }
    }
}
