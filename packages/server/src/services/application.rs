use std::collections::HashMap;

use chrono::Utc;
use common::ApplicationStatus;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::debug;

use super::{companies_by_id, jobs_by_id};
use crate::entity::{job, job_application, user};
use crate::error::AppError;
use crate::models::application::{
    ApplicantJob, ApplicantUser, ApplicationJob, CompanyApplicant, UserApplication,
};
use crate::models::company::CompanySummary;

/// Attempts at flipping a job's visibility before reporting a conflict.
const MAX_TOGGLE_ATTEMPTS: usize = 3;

const ALREADY_APPLIED: &str = "You have already applied for this job";

/// Applications of users to jobs, and the company-side decisions on them.
pub struct ApplicationService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ApplicationService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Record a pending application of `user_id` to `job_id`.
    ///
    /// The unique `(user_id, job_id)` index turns a concurrent duplicate into
    /// a conflict as well.
    pub async fn apply(
        &self,
        job_id: i32,
        user_id: &str,
    ) -> Result<job_application::Model, AppError> {
        let existing = job_application::Entity::find()
            .filter(job_application::Column::UserId.eq(user_id))
            .filter(job_application::Column::JobId.eq(job_id))
            .one(self.conn)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(ALREADY_APPLIED.into()));
        }

        let job = job::Entity::find_by_id(job_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Job Not Found".into()))?;

        self.insert_application(&job, user_id).await
    }

    async fn insert_application(
        &self,
        job: &job::Model,
        user_id: &str,
    ) -> Result<job_application::Model, AppError> {
        let application = job_application::ActiveModel {
            user_id: Set(user_id.to_string()),
            job_id: Set(job.id),
            company_id: Set(job.company_id),
            status: Set(ApplicationStatus::Pending.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        application
            .insert(self.conn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    debug!("Duplicate application caught by unique index");
                    AppError::Conflict(ALREADY_APPLIED.into())
                }
                _ => AppError::from(e),
            })
    }

    /// Applications of one user, oldest first, with company and job details.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<UserApplication>, AppError> {
        let applications = job_application::Entity::find()
            .filter(job_application::Column::UserId.eq(user_id))
            .order_by_asc(job_application::Column::Id)
            .all(self.conn)
            .await?;
        if applications.is_empty() {
            return Ok(Vec::new());
        }

        let jobs = jobs_by_id(self.conn, applications.iter().map(|a| a.job_id)).await?;
        let companies =
            companies_by_id(self.conn, applications.iter().map(|a| a.company_id)).await?;

        Ok(applications
            .into_iter()
            .map(|a| UserApplication {
                id: a.id,
                company: companies.get(&a.company_id).map(CompanySummary::from),
                job: jobs.get(&a.job_id).map(ApplicationJob::from),
                status: a.status,
                created_at: a.created_at,
            })
            .collect())
    }

    /// Applications received by one company, oldest first, with applicant
    /// and job details. Users deleted since applying show up as `None`.
    pub async fn list_for_company(
        &self,
        company_id: i32,
    ) -> Result<Vec<CompanyApplicant>, AppError> {
        let applications = job_application::Entity::find()
            .filter(job_application::Column::CompanyId.eq(company_id))
            .order_by_asc(job_application::Column::Id)
            .all(self.conn)
            .await?;
        if applications.is_empty() {
            return Ok(Vec::new());
        }

        let jobs = jobs_by_id(self.conn, applications.iter().map(|a| a.job_id)).await?;
        let users: HashMap<String, user::Model> = user::Entity::find()
            .filter(
                user::Column::Id.is_in(applications.iter().map(|a| a.user_id.clone())),
            )
            .all(self.conn)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(applications
            .into_iter()
            .map(|a| CompanyApplicant {
                id: a.id,
                user: users.get(&a.user_id).map(ApplicantUser::from),
                job: jobs.get(&a.job_id).map(ApplicantJob::from),
                status: a.status,
                created_at: a.created_at,
            })
            .collect())
    }

    /// Set the status of an application owned by `company_id`.
    pub async fn change_status(
        &self,
        application_id: i32,
        status: ApplicationStatus,
        company_id: i32,
    ) -> Result<(), AppError> {
        let result = job_application::Entity::update_many()
            .col_expr(
                job_application::Column::Status,
                Expr::value(status.as_str()),
            )
            .filter(job_application::Column::Id.eq(application_id))
            .filter(job_application::Column::CompanyId.eq(company_id))
            .exec(self.conn)
            .await?;

        if result.rows_affected > 0 {
            return Ok(());
        }

        let exists = job_application::Entity::find_by_id(application_id)
            .one(self.conn)
            .await?
            .is_some();
        if exists {
            Err(AppError::PermissionDenied(
                "Not authorized to change this application".into(),
            ))
        } else {
            Err(AppError::NotFound("Application not found".into()))
        }
    }

    /// Flip the visibility of a job owned by `company_id` and return the job
    /// as updated.
    ///
    /// The write only lands if the flag still holds the value that was read,
    /// so two concurrent toggles never cancel into a lost update.
    pub async fn toggle_visibility(
        &self,
        job_id: i32,
        company_id: i32,
    ) -> Result<job::Model, AppError> {
        for attempt in 1..=MAX_TOGGLE_ATTEMPTS {
            let mut job = job::Entity::find_by_id(job_id)
                .one(self.conn)
                .await?
                .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

            if job.company_id != company_id {
                return Err(AppError::PermissionDenied(
                    "Not authorized to change this job".into(),
                ));
            }

            if self.flip_visibility(&job).await? {
                job.visible = !job.visible;
                return Ok(job);
            }
            debug!(job_id, attempt, "Visibility changed concurrently, retrying");
        }

        Err(AppError::Conflict(
            "Job visibility is being changed concurrently, try again".into(),
        ))
    }

    /// Write `!job.visible` only if the stored flag still equals `job.visible`.
    /// Returns whether the write landed.
    async fn flip_visibility(&self, job: &job::Model) -> Result<bool, AppError> {
        let result = job::Entity::update_many()
            .col_expr(job::Column::Visible, Expr::value(!job.visible))
            .filter(job::Column::Id.eq(job.id))
            .filter(job::Column::CompanyId.eq(job.company_id))
            .filter(job::Column::Visible.eq(job.visible))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
