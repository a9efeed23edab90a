//! The screen registry.
//!
//! Each of the eight screens is declared once: its menu label, heading,
//! submit label, input fields, and the backend operation it calls. Front
//! ends walk [`ScreenKind::ALL`] to build the picker and
//! [`ScreenKind::fields`] to build the form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ClientError, Result};

/// Canonical form field keys; also the canonical query parameter names.
pub mod field {
    /// Login name.
    pub const USERNAME: &str = "username";
    /// Login password.
    pub const PASSWORD: &str = "password";
    /// Subject code, e.g. `MIST`.
    pub const SUBJECT_CODE: &str = "subjectCode";
    /// Course number, e.g. `460`.
    pub const COURSE_NUMBER: &str = "courseNumber";
    /// The session student id.
    pub const STUDENT_ID: &str = "studentID";
    /// A course offering id.
    pub const COURSE_OFFERING_ID: &str = "courseOfferingID";
    /// Free-text job description.
    pub const JOB_DESCRIPTION: &str = "jobDescription";
}

/// How a form field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Single-line text entered without echo.
    Secret,
    /// Integer of at least 1.
    PositiveInt,
    /// Filled from the session; never typed by the user.
    SessionStudentId,
    /// Multi-line text pre-filled from a picked job description.
    JobDescription,
}

/// One input on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the submitted [`Form`].
    pub key: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    /// Input kind.
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    /// Returns `true` if the user types this field.
    #[must_use]
    pub const fn is_user_entered(&self) -> bool {
        !matches!(self.kind, FieldKind::SessionStudentId)
    }
}

const USERNAME: FieldSpec = FieldSpec::new(field::USERNAME, "Username", FieldKind::Text);
const PASSWORD: FieldSpec = FieldSpec::new(field::PASSWORD, "Password", FieldKind::Secret);
const SUBJECT_CODE: FieldSpec = FieldSpec::new(field::SUBJECT_CODE, "Subject Code", FieldKind::Text);
const COURSE_NUMBER: FieldSpec =
    FieldSpec::new(field::COURSE_NUMBER, "Course Number", FieldKind::Text);
const STUDENT_ID: FieldSpec =
    FieldSpec::new(field::STUDENT_ID, "Student ID", FieldKind::SessionStudentId);
const COURSE_OFFERING_ID: FieldSpec = FieldSpec::new(
    field::COURSE_OFFERING_ID,
    "Course Offering ID",
    FieldKind::PositiveInt,
);
const JOB_DESCRIPTION: FieldSpec = FieldSpec::new(
    field::JOB_DESCRIPTION,
    "Detailed Job Description",
    FieldKind::JobDescription,
);

const LOGIN_FIELDS: &[FieldSpec] = &[USERNAME, PASSWORD];
const COURSE_FIELDS: &[FieldSpec] = &[SUBJECT_CODE, COURSE_NUMBER];
const JOB_FIELDS: &[FieldSpec] = &[JOB_DESCRIPTION];
const STUDENT_COURSE_FIELDS: &[FieldSpec] = &[STUDENT_ID, SUBJECT_CODE, COURSE_NUMBER];
const STUDENT_OFFERING_FIELDS: &[FieldSpec] = &[STUDENT_ID, COURSE_OFFERING_ID];
const STUDENT_FIELDS: &[FieldSpec] = &[STUDENT_ID];

/// The eight screens of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    /// Log in with username and password.
    ValidateUser,
    /// Current semester offerings of a course.
    FindCourseOfferings,
    /// Prerequisites of a course.
    FindPrerequisites,
    /// Course recommendations for a job description.
    Recommendations,
    /// Whether the student has taken every prerequisite of a course.
    CheckPrerequisites,
    /// Enroll the student in an offering.
    EnrollStudent,
    /// The student's enrolled offerings.
    EnrolledCourses,
    /// Drop the student from an offering.
    DropCourse,
}

impl ScreenKind {
    /// All screens in picker order.
    pub const ALL: [Self; 8] = [
        Self::ValidateUser,
        Self::FindCourseOfferings,
        Self::FindPrerequisites,
        Self::Recommendations,
        Self::CheckPrerequisites,
        Self::EnrollStudent,
        Self::EnrolledCourses,
        Self::DropCourse,
    ];

    /// Label shown in the picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ValidateUser => "Validate User",
            Self::FindCourseOfferings => "Find Current Semester Course Offerings",
            Self::FindPrerequisites => "Find Prerequisites",
            Self::Recommendations => "Get Recommendations for Job Description",
            Self::CheckPrerequisites => "Check Prerequisite Completion",
            Self::EnrollStudent => "Enroll Student",
            Self::EnrolledCourses => "Get Enrolled Courses",
            Self::DropCourse => "Drop Course",
        }
    }

    /// Heading shown above the form.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::ValidateUser => "Validate User",
            Self::FindCourseOfferings => "Find Current Semester Course Offerings",
            Self::FindPrerequisites => "Find Prerequisites for a Course",
            Self::Recommendations => "Course Recommendations for Job",
            Self::CheckPrerequisites => "Has Student Taken All Prerequisites For a Course?",
            Self::EnrollStudent => "Enroll Student in Course Offering",
            Self::EnrolledCourses => "Get Enrolled Courses for Student",
            Self::DropCourse => "Drop Course",
        }
    }

    /// Label of the submit action.
    #[must_use]
    pub const fn submit_label(self) -> &'static str {
        match self {
            Self::ValidateUser => "Validate",
            Self::FindCourseOfferings => "Find Offerings",
            Self::FindPrerequisites => "Find Prerequisites",
            Self::Recommendations => "Get Recommendations",
            Self::CheckPrerequisites => "Check Prerequisites",
            Self::EnrollStudent => "Enroll",
            Self::EnrolledCourses => "Get Student's Enrollments",
            Self::DropCourse => "Drop",
        }
    }

    /// Inputs in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::ValidateUser => LOGIN_FIELDS,
            Self::FindCourseOfferings | Self::FindPrerequisites => COURSE_FIELDS,
            Self::Recommendations => JOB_FIELDS,
            Self::CheckPrerequisites => STUDENT_COURSE_FIELDS,
            Self::EnrollStudent | Self::DropCourse => STUDENT_OFFERING_FIELDS,
            Self::EnrolledCourses => STUDENT_FIELDS,
        }
    }

    /// Returns `true` if the screen needs a logged-in student.
    #[must_use]
    pub const fn requires_student(self) -> bool {
        matches!(
            self,
            Self::Recommendations
                | Self::CheckPrerequisites
                | Self::EnrollStudent
                | Self::EnrolledCourses
                | Self::DropCourse
        )
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScreenKind {
    type Err = ClientError;

    /// Accepts a label (case-insensitive) or a 1-based picker position.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if let Ok(position) = wanted.parse::<usize>() {
            if let Some(kind) = position.checked_sub(1).and_then(|i| Self::ALL.get(i)) {
                return Ok(*kind);
            }
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ClientError::invalid_input(
                    "Screen",
                    format!("'{wanted}' is not a screen; pick 1-{} or a label", Self::ALL.len()),
                )
            })
    }
}

/// Values entered on a screen, keyed by [`FieldSpec::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    values: BTreeMap<&'static str, String>,
}

impl Form {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets a field value.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Builder form of [`Form::set`].
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Text value of a field; unset fields read as empty.
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    /// Parses a field as an integer of at least 1.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidInput` naming `label` otherwise.
    pub fn positive_int(&self, key: &str, label: &str) -> Result<i64> {
        match self.text(key).trim().parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ClientError::invalid_input(label, "must be a positive integer")),
        }
    }
}
