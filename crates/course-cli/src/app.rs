//! The interactive front end: screen picker, forms, and rendered results.

use std::io::{self, BufRead, Write};

use course_client::{FieldKind, Form, ScreenKind, ScreenOutput, Screens, Session};
use course_render::{render, MarkdownRenderer, OutputFormat};
use tracing::debug;

use crate::prompt::Prompter;

/// Extra picker entry after the eight screens.
const QUIT: &str = "Quit";

/// One user session driving the screens from a prompter.
pub struct App<R, W> {
    screens: Screens,
    session: Session,
    prompter: Prompter<R, W>,
    format: OutputFormat,
}

impl<R: BufRead, W: Write> App<R, W> {
    /// Creates an app with nobody logged in.
    pub fn new(screens: Screens, prompter: Prompter<R, W>, format: OutputFormat) -> Self {
        Self {
            screens,
            session: Session::new(),
            prompter,
            format,
        }
    }

    /// The session state.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Shows the picker until the user quits or input ends.
    pub async fn run_menu(&mut self) -> anyhow::Result<()> {
        let mut options: Vec<String> = ScreenKind::ALL
            .iter()
            .map(|kind| kind.label().to_string())
            .collect();
        options.push(QUIT.to_string());

        loop {
            self.write_header()?;
            let Some(choice) = self.prompter.choose("Select a screen:", &options)? else {
                return Ok(());
            };
            let Some(kind) = ScreenKind::ALL.get(choice).copied() else {
                return Ok(());
            };
            if self.run_screen(kind).await?.is_none() {
                return Ok(());
            }
        }
    }

    /// Runs one screen: collects its form, submits it, prints the result.
    ///
    /// Returns `None` if input ended before the form was complete.
    pub async fn run_screen(&mut self, kind: ScreenKind) -> anyhow::Result<Option<ScreenOutput>> {
        writeln!(self.prompter.output(), "\n== {} ==", kind.header())?;

        if kind.requires_student() && self.session.current_user().is_none() {
            // The handler reports the missing login without contacting the backend.
            let out = self.screens.submit(kind, &Form::new(), &mut self.session).await;
            self.show(kind, &out)?;
            return Ok(Some(out));
        }

        if kind == ScreenKind::Recommendations {
            return self.run_recommendations().await;
        }

        let Some(form) = self.collect_form(kind)? else {
            return Ok(None);
        };
        writeln!(self.prompter.output(), "[{}]", kind.submit_label())?;
        debug!(screen = %kind, "Submitting form");

        let out = self.screens.submit(kind, &form, &mut self.session).await;
        self.show(kind, &out)?;
        Ok(Some(out))
    }

    /// Picks a job description, lets the user edit it, and asks for recommendations.
    async fn run_recommendations(&mut self) -> anyhow::Result<Option<ScreenOutput>> {
        let kind = ScreenKind::Recommendations;
        let mut out = ScreenOutput::new();

        let jobs = match self.screens.job_descriptions(&mut out).await {
            Some(jobs) if !jobs.is_empty() => jobs,
            _ => {
                self.show(kind, &out)?;
                return Ok(Some(out));
            }
        };

        let labels: Vec<String> = jobs.iter().map(|job| job.label.clone()).collect();
        let Some(job) = self
            .prompter
            .choose("Select a Job Description:", &labels)?
            .and_then(|index| jobs.get(index))
        else {
            return Ok(None);
        };

        let mut selection = ScreenOutput::new();
        selection.text("You selected:");
        selection.text(format!("Job: {}", job.label));
        self.show(kind, &selection)?;
        out.elements.append(&mut selection.elements);

        let Some(detail) = self
            .prompter
            .line_with_default("Detailed Job Description", &job.detail)?
        else {
            return Ok(None);
        };
        writeln!(self.prompter.output(), "[{}]", kind.submit_label())?;

        let form = Form::new().with(course_client::field::JOB_DESCRIPTION, detail);
        let mut result = self.screens.submit(kind, &form, &mut self.session).await;
        self.show(kind, &result)?;
        out.elements.append(&mut result.elements);
        Ok(Some(out))
    }

    /// Prompts for every user-entered field of a screen.
    fn collect_form(&mut self, kind: ScreenKind) -> io::Result<Option<Form>> {
        let mut form = Form::new();
        for spec in kind.fields() {
            let value = match spec.kind {
                FieldKind::SessionStudentId => {
                    let shown = self
                        .session
                        .current_user_id()
                        .map_or_else(|| "(not logged in)".to_string(), |id| id.to_string());
                    writeln!(self.prompter.output(), "{}: {shown}", spec.label)?;
                    continue;
                }
                FieldKind::Secret => self.prompter.secret(spec.label)?,
                FieldKind::Text | FieldKind::PositiveInt | FieldKind::JobDescription => {
                    self.prompter.line(spec.label)?
                }
            };
            let Some(value) = value else {
                return Ok(None);
            };
            form.set(spec.key, value);
        }
        Ok(Some(form))
    }

    fn write_header(&mut self) -> io::Result<()> {
        let status = self.session.current_user().map_or_else(
            || "Not logged in".to_string(),
            |user| {
                format!(
                    "Logged in as {} (ID {}) since {}",
                    user.full_name,
                    user.id,
                    user.validated_at.format("%H:%M:%S UTC")
                )
            },
        );
        let out = self.prompter.output();
        writeln!(out, "\nCourse Recommender")?;
        writeln!(out, "{status}")
    }

    fn show(&mut self, kind: ScreenKind, out: &ScreenOutput) -> anyhow::Result<()> {
        if out.is_empty() {
            return Ok(());
        }
        let rendered = match self.format {
            OutputFormat::Markdown => MarkdownRenderer::new(out).with_heading(kind.header()).render(),
            format => render(out, format)?,
        };
        let writer = self.prompter.output();
        write!(writer, "{rendered}")?;
        if !rendered.ends_with('\n') {
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}
