//! Admin provisioning of schools and courses.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{CourseRepository, SchoolRepository};
use crate::domain::types::{Course, School};
use crate::error::AttendanceServiceError;

pub struct CreateSchoolInput {
    pub name: String,
}

pub struct CreateSchoolUseCase<S>
where
    S: SchoolRepository,
{
    pub schools: S,
}

impl<S> CreateSchoolUseCase<S>
where
    S: SchoolRepository,
{
    pub async fn execute(
        &self,
        input: CreateSchoolInput,
    ) -> Result<School, AttendanceServiceError> {
        let school = School {
            id: Uuid::new_v4(),
            name: input.name,
            created_at: Utc::now(),
        };
        self.schools.create(&school).await?;
        Ok(school)
    }
}

pub struct CreateCourseInput {
    pub school_id: Uuid,
    pub code: String,
    pub name: String,
}

pub struct CreateCourseUseCase<S, C>
where
    S: SchoolRepository,
    C: CourseRepository,
{
    pub schools: S,
    pub courses: C,
}

impl<S, C> CreateCourseUseCase<S, C>
where
    S: SchoolRepository,
    C: CourseRepository,
{
    pub async fn execute(
        &self,
        input: CreateCourseInput,
    ) -> Result<Course, AttendanceServiceError> {
        self.schools
            .find_by_id(input.school_id)
            .await?
            .ok_or(AttendanceServiceError::SchoolNotFound)?;
        if self.courses.find_by_code(&input.code).await?.is_some() {
            return Err(AttendanceServiceError::CourseCodeTaken);
        }

        let course = Course {
            id: Uuid::new_v4(),
            school_id: input.school_id,
            code: input.code,
            name: input.name,
            created_at: Utc::now(),
        };
        self.courses.create(&course).await?;
        Ok(course)
    }
}
