use parking_lot::RwLock;
use sched_core::{SchedError, SolveEnvelope, SolveResult, Solver};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct JobId(pub String);

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Solved { result: SolveResult },
    /// No feasible start schedule exists for the instance.
    Infeasible { message: String },
    Failed { message: String },
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

fn finish(outcome: anyhow::Result<Result<SolveResult, SchedError>>) -> JobStatus {
    match outcome {
        Ok(Ok(result)) => JobStatus::Solved { result },
        Ok(Err(e)) if e.is_infeasible() => {
            warn!(error = %e, "job infeasible");
            JobStatus::Infeasible {
                message: e.to_string(),
            }
        }
        Ok(Err(e)) => {
            error!(error = %e, "job failed");
            JobStatus::Failed {
                message: e.to_string(),
            }
        }
        Err(e) => {
            error!(error = ?e, "solver task aborted");
            JobStatus::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// Job registry kept in memory; solves run on the blocking pool.
#[derive(Clone)]
pub struct InMemJobs<S: Solver> {
    inner: Arc<RwLock<HashMap<String, JobStatus>>>,
    solver: Arc<S>,
}

impl<S: Solver> InMemJobs<S> {
    pub fn new(solver: S) -> Self {
        Self {
            inner: Default::default(),
            solver: Arc::new(solver),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn enqueue(&self, env: SolveEnvelope) -> JobId {
        let id = Uuid::new_v4().to_string();
        self.inner.write().insert(id.clone(), JobStatus::Queued);

        let map = self.inner.clone();
        let solver = self.solver.clone();
        let id_for_task = id.clone();

        tokio::spawn(async move {
            map.write().insert(id_for_task.clone(), JobStatus::Running);
            info!(job = %id_for_task, "job started");

            let outcome = tokio::task::spawn_blocking(move || solver.solve(env))
                .await
                .map_err(anyhow::Error::from);
            let status = finish(outcome);

            info!(job = %id_for_task, finished = status.is_finished(), "job done");
            map.write().insert(id_for_task, status);
        });

        JobId(id)
    }

    pub fn get(&self, id: &str) -> Option<JobStatus> {
        self.inner.read().get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::TimetableInstance;
    use std::time::Duration;

    fn env() -> SolveEnvelope {
        SolveEnvelope {
            instance: TimetableInstance {
                students: vec![vec![vec![0]]],
                assistants: vec![vec![vec![0]]],
                forbidden: vec![vec![0]],
                baseline: None,
            },
            params: Default::default(),
        }
    }

    struct Fixed;

    impl Solver for Fixed {
        fn solve(&self, _env: SolveEnvelope) -> Result<SolveResult, SchedError> {
            Ok(SolveResult {
                status: "solved".into(),
                fitness: 0.5,
                covered_students: 1,
                total_students: 1,
                attendance_pct: 100.0,
                assignments: Vec::new(),
                grid: Vec::new(),
                stats: serde_json::json!({}),
            })
        }
    }

    struct Stuck;

    impl Solver for Stuck {
        fn solve(&self, _env: SolveEnvelope) -> Result<SolveResult, SchedError> {
            Err(SchedError::InfeasibleAssignment { assistant: 3 })
        }
    }

    struct Broken;

    impl Solver for Broken {
        fn solve(&self, _env: SolveEnvelope) -> Result<SolveResult, SchedError> {
            Err(SchedError::InvalidParams("alpha must be in (0, 1)".into()))
        }
    }

    async fn wait<S: Solver>(jobs: &InMemJobs<S>, id: &JobId) -> JobStatus {
        for _ in 0..200 {
            if let Some(st) = jobs.get(&id.0) {
                if st.is_finished() {
                    return st;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {} did not finish", id.0);
    }

    #[tokio::test]
    async fn solved_job_keeps_result() {
        let jobs = InMemJobs::new(Fixed);
        let id = jobs.enqueue(env());
        match wait(&jobs, &id).await {
            JobStatus::Solved { result } => assert_eq!(result.fitness, 0.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn infeasible_is_reported_separately() {
        let jobs = InMemJobs::new(Stuck);
        let id = jobs.enqueue(env());
        match wait(&jobs, &id).await {
            JobStatus::Infeasible { message } => assert!(message.contains("assistant 3")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_errors_fail_the_job() {
        let jobs = InMemJobs::new(Broken);
        let id = jobs.enqueue(env());
        assert!(matches!(
            wait(&jobs, &id).await,
            JobStatus::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let jobs = InMemJobs::new(Fixed);
        assert!(jobs.get("nope").is_none());
    }

    #[test]
    fn status_serializes_with_tag() {
        let v = serde_json::to_value(JobStatus::Infeasible {
            message: "x".into(),
        })
        .expect("serializable");
        assert_eq!(v["status"], "infeasible");
        assert_eq!(v["message"], "x");
        let q = serde_json::to_value(JobStatus::Queued).expect("serializable");
        assert_eq!(q["status"], "queued");
    }
}
