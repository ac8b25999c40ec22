use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::companies_by_id;
use crate::entity::{company, job, job_application};
use crate::error::AppError;
use crate::models::company::CompanySummary;
use crate::models::job::{JobView, JobWithCompany, PostedJob, PostJobRequest};

/// Read side of jobs, plus job creation.
pub struct JobListing<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> JobListing<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All jobs currently open to the public, in posting order.
    pub async fn list_visible(&self) -> Result<Vec<JobWithCompany>, AppError> {
        let jobs = job::Entity::find()
            .filter(job::Column::Visible.eq(true))
            .order_by_asc(job::Column::Id)
            .all(self.conn)
            .await?;

        let companies = companies_by_id(self.conn, jobs.iter().map(|j| j.company_id)).await?;

        Ok(jobs
            .into_iter()
            .map(|j| JobWithCompany {
                company: companies.get(&j.company_id).map(CompanySummary::from),
                job: JobView::from(j),
            })
            .collect())
    }

    /// One job regardless of visibility.
    pub async fn get(&self, job_id: i32) -> Result<JobWithCompany, AppError> {
        let job = job::Entity::find_by_id(job_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".into()))?;

        let company = company::Entity::find_by_id(job.company_id)
            .one(self.conn)
            .await?;

        Ok(JobWithCompany {
            company: company.as_ref().map(CompanySummary::from),
            job: JobView::from(job),
        })
    }

    /// Every job a company posted, with the number of applications each
    /// received. Counted per request.
    pub async fn list_for_company(&self, company_id: i32) -> Result<Vec<PostedJob>, AppError> {
        let jobs = job::Entity::find()
            .filter(job::Column::CompanyId.eq(company_id))
            .order_by_asc(job::Column::Id)
            .all(self.conn)
            .await?;
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let counts: HashMap<i32, i64> = job_application::Entity::find()
            .select_only()
            .column(job_application::Column::JobId)
            .column_as(Expr::cust("COUNT(*)"), "applicants")
            .filter(job_application::Column::JobId.is_in(jobs.iter().map(|j| j.id)))
            .group_by(job_application::Column::JobId)
            .into_tuple::<(i32, i64)>()
            .all(self.conn)
            .await?
            .into_iter()
            .collect();

        Ok(jobs
            .into_iter()
            .map(|j| PostedJob {
                applicants: counts.get(&j.id).copied().unwrap_or(0) as u64,
                job: JobView::from(j),
            })
            .collect())
    }

    /// Create a visible job owned by `company_id`. Fields must already be validated.
    pub async fn post_job(
        &self,
        company_id: i32,
        payload: PostJobRequest,
    ) -> Result<job::Model, AppError> {
        let model = job::ActiveModel {
            title: Set(payload.title.trim().to_string()),
            description: Set(payload.description),
            location: Set(payload.location.trim().to_string()),
            salary: Set(payload.salary),
            level: Set(payload.level.trim().to_string()),
            category: Set(payload.category.trim().to_string()),
            visible: Set(true),
            company_id: Set(company_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        Ok(model.insert(self.conn).await?)
    }
}
