use crate::{
    modes::{Mode, classify},
    schedules::{LatestLogs, SchedulesByJob},
    settings::{NonDefaultSettings, SettingsResolver},
};
use bkp_models::dtos::{Job, JobMode, JobType, Log, Schedule};
use serde::Serialize;

/// Characters `start..end` of `text`, or whatever part of that range exists.
pub fn slice_chars(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

/// The short form of an id shown in tables.
pub fn short_id(id: &str) -> String {
    slice_chars(id, 4, 8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleToggle {
    Enable,
    Disable,
}

impl ScheduleToggle {
    /// The toggle a schedule in the given state offers.
    pub fn offered_for(enabled: bool) -> Self {
        if enabled { Self::Disable } else { Self::Enable }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum ScheduleAction {
    Run {
        job_id: String,
        job_name: String,
        schedule_id: String,
        job_type: JobType,
    },
    Cancel {
        job_id: String,
        run_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePreview {
    pub schedule: Schedule,
    pub title: String,
    pub short_id: String,
    pub toggle: ScheduleToggle,
    pub action: ScheduleAction,
    pub last_run: Option<Log>,
}

impl SchedulePreview {
    pub fn new(job: &Job, schedule: &Schedule, last_run: Option<&Log>) -> Self {
        let action = match &job.run_id {
            Some(run_id) => ScheduleAction::Cancel {
                job_id: job.id.clone(),
                run_id: run_id.clone(),
            },
            None => ScheduleAction::Run {
                job_id: job.id.clone(),
                job_name: job.name.clone(),
                schedule_id: schedule.id.clone(),
                job_type: job.job_type,
            },
        };
        Self {
            schedule: schedule.clone(),
            title: schedule.title().to_owned(),
            short_id: short_id(&schedule.id),
            toggle: ScheduleToggle::offered_for(schedule.enabled),
            action,
            last_run: last_run.cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum RowAction {
    MatchingVms { enabled: bool },
    Edit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub job_type: JobType,
    pub mode: Option<JobMode>,
    pub modes: Vec<Mode>,
    pub schedules: Vec<SchedulePreview>,
    pub settings: NonDefaultSettings,
    pub actions: Vec<RowAction>,

    #[serde(skip)]
    pub job: Job,
}

/// Derives the rows of the overview table from the job, schedule and log
/// collections. Pure: the same inputs always give the same rows.
pub struct JobViewModelBuilder<'a> {
    resolver: &'a SettingsResolver,
}

impl<'a> JobViewModelBuilder<'a> {
    pub fn new(resolver: &'a SettingsResolver) -> Self {
        Self { resolver }
    }

    pub fn build_row(&self, job: &Job, schedules: &[Schedule], latest_logs: &LatestLogs) -> Row {
        let schedules = schedules
            .iter()
            .map(|schedule| SchedulePreview::new(job, schedule, latest_logs.get(&schedule.id)))
            .collect();

        Row {
            id: job.id.clone(),
            short_id: short_id(&job.id),
            name: job.name.clone(),
            job_type: job.job_type,
            mode: job.mode,
            modes: classify(job),
            schedules,
            settings: self
                .resolver
                .resolve_non_default(job.mode, &job.base_settings()),
            actions: vec![
                RowAction::MatchingVms {
                    enabled: job.job_type == JobType::Backup,
                },
                RowAction::Edit,
            ],
            job: job.clone(),
        }
    }

    /// One row per job: backup jobs first, then metadata jobs. Ids are not
    /// deduplicated across the two collections.
    pub fn build_rows(
        &self,
        jobs: &[Job],
        metadata_jobs: &[Job],
        schedules_by_job: &SchedulesByJob,
        latest_logs: &LatestLogs,
    ) -> Vec<Row> {
        jobs.iter()
            .chain(metadata_jobs.iter())
            .map(|job| {
                let schedules = schedules_by_job
                    .get(&job.id)
                    .map(|s| s.as_slice())
                    .unwrap_or_default();
                self.build_row(job, schedules, latest_logs)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedules::group_by_job;
    use bkp_models::dtos::{DEFAULT_SETTINGS_KEY, JobSettings};
    use serde_json::json;

    fn job(id: &str, job_type: JobType) -> Job {
        Job {
            id: id.to_string(),
            name: format!("{id} name"),
            job_type,
            ..Default::default()
        }
    }

    fn schedule(id: &str, job_id: &str, enabled: bool) -> Schedule {
        Schedule {
            id: id.to_string(),
            job_id: job_id.to_string(),
            cron: "0 3 * * *".to_string(),
            enabled,
            ..Default::default()
        }
    }

    #[test]
    fn short_ids_are_safe_on_short_input() {
        assert_eq!(short_id("0123456789"), "4567");
        assert_eq!(short_id("01234"), "4");
        assert_eq!(short_id("012"), "");
        assert_eq!(slice_chars("héllo wörld", 0, 5), "héllo");
    }

    #[test]
    fn rows_keep_input_order_without_deduplication() {
        let resolver = SettingsResolver::default();
        let builder = JobViewModelBuilder::new(&resolver);
        let rows = builder.build_rows(
            &[job("A", JobType::Backup), job("B", JobType::Backup)],
            &[job("A", JobType::MetadataBackup)],
            &SchedulesByJob::new(),
            &LatestLogs::default(),
        );

        let ids = rows
            .iter()
            .map(|r| (r.id.as_str(), r.job_type))
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                ("A", JobType::Backup),
                ("B", JobType::Backup),
                ("A", JobType::MetadataBackup)
            ]
        );
    }

    #[test]
    fn schedules_are_paired_with_latest_log() {
        let resolver = SettingsResolver::default();
        let builder = JobViewModelBuilder::new(&resolver);
        let schedules = group_by_job(&[
            schedule("sched-0001", "job-1", true),
            schedule("sched-0002", "job-1", false),
            schedule("sched-0003", "missing-job", true),
        ]);
        let logs = LatestLogs::index(&[
            Log {
                id: "run-1".to_string(),
                schedule_id: Some("sched-0001".to_string()),
                start: 5,
                ..Default::default()
            },
            Log {
                id: "run-2".to_string(),
                schedule_id: Some("sched-0001".to_string()),
                start: 9,
                ..Default::default()
            },
        ]);

        let rows = builder.build_rows(&[job("job-1", JobType::Backup)], &[], &schedules, &logs);
        assert_eq!(rows.len(), 1);

        let previews = &rows[0].schedules;
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].short_id, "d-00");
        assert_eq!(previews[0].toggle, ScheduleToggle::Disable);
        assert_eq!(
            previews[0].last_run.as_ref().map(|l| l.id.as_str()),
            Some("run-2")
        );
        assert_eq!(previews[1].toggle, ScheduleToggle::Enable);
        assert!(previews[1].last_run.is_none());
        assert_eq!(
            previews[1].action,
            ScheduleAction::Run {
                job_id: "job-1".to_string(),
                job_name: "job-1 name".to_string(),
                schedule_id: "sched-0002".to_string(),
                job_type: JobType::Backup,
            }
        );
    }

    #[test]
    fn running_job_offers_cancel() {
        let resolver = SettingsResolver::default();
        let builder = JobViewModelBuilder::new(&resolver);
        let mut running = job("job-1", JobType::Backup);
        running.run_id = Some("run-9".to_string());

        let row = builder.build_row(
            &running,
            &[schedule("sched-1", "job-1", true)],
            &LatestLogs::default(),
        );
        assert_eq!(
            row.schedules[0].action,
            ScheduleAction::Cancel {
                job_id: "job-1".to_string(),
                run_id: "run-9".to_string()
            }
        );
    }

    #[test]
    fn row_summarizes_job() {
        let resolver = SettingsResolver::default();
        let builder = JobViewModelBuilder::new(&resolver);
        let mut backup = job("0000abcdef", JobType::Backup);
        backup.mode = Some(JobMode::Full);
        backup.compression = Some("native".to_string());
        backup.remotes = Some(json!({ "id": "remote-1" }));
        backup.settings.insert(
            DEFAULT_SETTINGS_KEY.to_string(),
            JobSettings {
                report_when: Some("always".to_string()),
                timeout: Some(7_200_000),
                ..Default::default()
            },
        );

        let row = builder.build_row(&backup, &[], &LatestLogs::default());
        assert_eq!(row.short_id, "abcd");
        assert_eq!(row.modes, vec![Mode::Backup]);
        assert_eq!(row.settings.compression, None);
        assert_eq!(row.settings.report_when.as_deref(), Some("always"));
        assert_eq!(row.settings.timeout, Some(2.0));
        assert_eq!(
            row.actions,
            vec![RowAction::MatchingVms { enabled: true }, RowAction::Edit]
        );

        let metadata = job("meta-1", JobType::MetadataBackup);
        let row = builder.build_row(&metadata, &[], &LatestLogs::default());
        assert_eq!(row.actions[0], RowAction::MatchingVms { enabled: false });
    }
}
