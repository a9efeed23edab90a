//! Screen handlers.
//!
//! Each handler turns one submitted [`Form`] into at most one backend call
//! (two for the recommendations screen) and maps the result onto notices,
//! text, tables, or markup. Backend failures never escape as `Err`: the
//! bridge reports them on the [`ScreenOutput`] and the handler decides what,
//! if anything, to add.

use tracing::{info, warn};

use crate::bridge::{Bridge, Fetched, QueryParams};
use crate::config::{Config, Operation};
use crate::error::Result;
use crate::output::ScreenOutput;
use crate::screen::{field, Form, ScreenKind};
use crate::session::Session;
use crate::table::Record;

// ============================================================================
// Response fields
// ============================================================================

const APP_USER_ID: &str = "AppUserID";
const FULL_NAME: &str = "FullName";
const ENROLLMENT_SUCCEEDED: &str = "EnrollmentSucceeded";
const ENROLLMENT_RESPONSE: &str = "EnrollmentResponse";
const ENROLLMENT_STATUS: &str = "EnrollmentStatus";
const JOB_LABEL: &str = "JobDescription";
const JOB_DETAIL: &str = "DetailedJobDescription";

/// Value of `EnrollmentStatus` after a successful drop.
const DROPPED: &str = "Dropped";

/// A job description offered by the recommendations screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescription {
    /// Short label shown in the picker.
    pub label: String,
    /// Long text pre-filled into the editable description.
    pub detail: String,
}

impl JobDescription {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            label: record.get_str(JOB_LABEL)?.to_string(),
            detail: record.get_display(JOB_DETAIL),
        })
    }
}

/// Runs screens against one backend.
#[derive(Debug, Clone)]
pub struct Screens {
    bridge: Bridge,
    config: Config,
}

impl Screens {
    /// Creates the handlers for a configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            bridge: Bridge::new(config)?,
            config: config.clone(),
        })
    }

    async fn call(&self, operation: Operation, params: QueryParams, out: &mut ScreenOutput) -> Fetched {
        let endpoint = self.config.endpoint(operation);
        self.bridge.fetch_endpoint(&endpoint, &params, out).await
    }

    /// Submits a screen's form.
    pub async fn submit(&self, kind: ScreenKind, form: &Form, session: &mut Session) -> ScreenOutput {
        match kind {
            ScreenKind::ValidateUser => self.validate_user(form, session).await,
            ScreenKind::FindCourseOfferings => self.find_course_offerings(form).await,
            ScreenKind::FindPrerequisites => self.find_prerequisites(form).await,
            ScreenKind::Recommendations => {
                self.recommend(form.text(field::JOB_DESCRIPTION), session)
                    .await
            }
            ScreenKind::CheckPrerequisites => self.check_prerequisites(form, session).await,
            ScreenKind::EnrollStudent => self.enroll_student(form, session).await,
            ScreenKind::EnrolledCourses => self.enrolled_courses(session).await,
            ScreenKind::DropCourse => self.drop_course(form, session).await,
        }
    }

    /// Validates a username/password pair and records the user on success.
    pub async fn validate_user(&self, form: &Form, session: &mut Session) -> ScreenOutput {
        let mut out = ScreenOutput::new();
        let params = QueryParams::new()
            .text(field::USERNAME, form.text(field::USERNAME))
            .text(field::PASSWORD, form.text(field::PASSWORD));

        let Fetched::Rows(table) = self.call(Operation::ValidateUser, params, &mut out).await else {
            out.error("Invalid username or password.");
            return out;
        };

        let user = table.first().map(|row| {
            row.get_i64(APP_USER_ID)
                .map(|id| (id, row.get_display(FULL_NAME)))
        });
        match user {
            Some(Ok((id, full_name))) => {
                out.success("User validated successfully!");
                out.text(format!("App User ID: {id}, Full Name: {full_name}"));
                session.set_current_user(id, full_name);
                info!(user_id = id, "User validated");
            }
            Some(Err(e)) => {
                warn!(error = %e, "Validation response unusable");
                out.error("Invalid username or password.");
            }
            None => out.error("Invalid username or password."),
        }
        out
    }

    /// Lists this semester's offerings of a course.
    pub async fn find_course_offerings(&self, form: &Form) -> ScreenOutput {
        self.course_lookup(
            Operation::FindCourseOfferings,
            form,
            "No course offerings found for the specified course.",
        )
        .await
    }

    /// Lists a course's prerequisites.
    pub async fn find_prerequisites(&self, form: &Form) -> ScreenOutput {
        self.course_lookup(
            Operation::FindPrerequisites,
            form,
            "No prerequisites found for the specified course.",
        )
        .await
    }

    async fn course_lookup(&self, operation: Operation, form: &Form, none_found: &str) -> ScreenOutput {
        let mut out = ScreenOutput::new();
        let params = QueryParams::new()
            .text(field::SUBJECT_CODE, form.text(field::SUBJECT_CODE))
            .text(field::COURSE_NUMBER, form.text(field::COURSE_NUMBER));

        match self.call(operation, params, &mut out).await {
            Fetched::Rows(table) => out.table(table),
            Fetched::Empty | Fetched::Absent => out.info(none_found),
        }
        out
    }

    /// Checks whether the student has taken every prerequisite of a course.
    ///
    /// An empty result means nothing is missing.
    pub async fn check_prerequisites(&self, form: &Form, session: &Session) -> ScreenOutput {
        let mut out = ScreenOutput::new();
        let Some(student_id) = session.require_student(&mut out) else {
            return out;
        };
        let params = QueryParams::new()
            .int(field::STUDENT_ID, student_id)
            .text(field::SUBJECT_CODE, form.text(field::SUBJECT_CODE))
            .text(field::COURSE_NUMBER, form.text(field::COURSE_NUMBER));

        match self.call(Operation::CheckPrerequisites, params, &mut out).await {
            Fetched::Empty => {
                out.success("The student has taken all prerequisites for the specified course.");
            }
            Fetched::Rows(missing) => {
                out.warning(
                    "The student has NOT taken all prerequisites for the specified course. Missing prerequisites:",
                );
                out.table(missing);
            }
            Fetched::Absent => out.error("Error checking prerequisites."),
        }
        out
    }

    /// Enrolls the student in a course offering.
    pub async fn enroll_student(&self, form: &Form, session: &Session) -> ScreenOutput {
        let mut out = ScreenOutput::new();
        let Some((student_id, offering_id)) = student_and_offering(form, session, &mut out) else {
            return out;
        };
        let params = QueryParams::new()
            .int(field::STUDENT_ID, student_id)
            .int(field::COURSE_OFFERING_ID, offering_id);

        let Fetched::Rows(table) = self.call(Operation::EnrollStudent, params, &mut out).await else {
            out.error("Could not complete enrollment request");
            return out;
        };

        let verdict = table.first().map(|row| {
            row.get_bool(ENROLLMENT_SUCCEEDED)
                .map(|ok| (ok, row.get_display(ENROLLMENT_RESPONSE)))
        });
        match verdict {
            Some(Ok((true, _))) => {
                out.success("Enrollment successful.");
                info!(student_id, offering_id, "Student enrolled");
            }
            Some(Ok((false, reason))) => out.error(format!("Enrollment failed. {reason}")),
            Some(Err(e)) => {
                warn!(error = %e, "Enrollment response unusable");
                out.error("Could not complete enrollment request");
            }
            None => out.error("Could not complete enrollment request"),
        }
        out
    }

    /// Lists the student's enrolled offerings.
    pub async fn enrolled_courses(&self, session: &Session) -> ScreenOutput {
        let mut out = ScreenOutput::new();
        let Some(student_id) = session.require_student(&mut out) else {
            return out;
        };
        let params = QueryParams::new().int(field::STUDENT_ID, student_id);

        match self.call(Operation::GetEnrolledCourses, params, &mut out).await {
            Fetched::Rows(table) => out.table(table),
            Fetched::Empty | Fetched::Absent => {
                out.info("No enrolled course offerings found for the specified student.");
            }
        }
        out
    }

    /// Drops the student from a course offering.
    ///
    /// A failed request leaves only the bridge's own error; no field is read.
    pub async fn drop_course(&self, form: &Form, session: &Session) -> ScreenOutput {
        let mut out = ScreenOutput::new();
        let Some((student_id, offering_id)) = student_and_offering(form, session, &mut out) else {
            return out;
        };
        let params = QueryParams::new()
            .int(field::STUDENT_ID, student_id)
            .int(field::COURSE_OFFERING_ID, offering_id);

        let table = match self.call(Operation::DropCourse, params, &mut out).await {
            Fetched::Absent => return out,
            Fetched::Empty => {
                out.error("Could not complete drop request");
                return out;
            }
            Fetched::Rows(table) => table,
        };

        match table.first().map(|row| row.get_str(ENROLLMENT_STATUS)) {
            Some(Ok(DROPPED)) => {
                out.success("Drop successful.");
                info!(student_id, offering_id, "Student dropped");
            }
            Some(Ok(status)) => out.error(format!("Drop failed. {status}")),
            Some(Err(e)) => {
                warn!(error = %e, "Drop response unusable");
                out.error("Could not complete drop request");
            }
            None => out.error("Could not complete drop request"),
        }
        out
    }

    /// Fetches the job descriptions offered by the recommendations screen.
    ///
    /// Returns `None` if the request failed. Rows without a label are skipped.
    pub async fn job_descriptions(&self, out: &mut ScreenOutput) -> Option<Vec<JobDescription>> {
        let table = self
            .call(Operation::GetJobDescriptions, QueryParams::new(), out)
            .await
            .into_table()?;

        let jobs: Vec<_> = table
            .rows()
            .iter()
            .filter_map(|row| match JobDescription::from_record(row) {
                Ok(job) => Some(job),
                Err(e) => {
                    warn!(error = %e, "Skipping job description row");
                    None
                }
            })
            .collect();

        if jobs.is_empty() {
            out.info("No job descriptions are available.");
        }
        Some(jobs)
    }

    /// Requests course recommendations for a job description.
    ///
    /// Requires a logged-in student; otherwise no request is made.
    pub async fn recommend(&self, job_description: &str, session: &Session) -> ScreenOutput {
        let mut out = ScreenOutput::new();
        let Some(student_id) = session.require_student(&mut out) else {
            return out;
        };
        let params = QueryParams::new()
            .text(field::JOB_DESCRIPTION, job_description)
            .int(field::STUDENT_ID, student_id);
        let endpoint = self.config.endpoint(Operation::GetRecommendations);

        if let Some(markup) = self.bridge.fetch_markup(&endpoint, &params, &mut out).await {
            out.success("Recommendations retrieved!");
            out.subheader("Recommended Courses");
            out.markup(markup);
            info!(student_id, "Recommendations retrieved");
        }
        out
    }
}

/// Reads the session student and the offering id, reporting whichever is missing.
fn student_and_offering(form: &Form, session: &Session, out: &mut ScreenOutput) -> Option<(i64, i64)> {
    let student_id = session.require_student(out)?;
    match form.positive_int(field::COURSE_OFFERING_ID, "Course Offering ID") {
        Ok(offering_id) => Some((student_id, offering_id)),
        Err(e) => {
            out.error(e.to_string());
            None
        }
    }
}
