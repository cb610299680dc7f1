use std::fmt::Display;
use std::future::Future;

use tablink_core::Record;
use tracing::{debug, info, warn};

/// Why [`update_if_missing`] left a named record alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target field is already populated.
    AlreadyPresent,
    /// The field the generator depends on is absent.
    MissingRequired,
}

/// A record whose generator call failed.
#[derive(Debug)]
pub struct BatchFailure<E> {
    /// Record name passed to the generator.
    pub name: String,
    /// Error returned by the generator.
    pub error: E,
}

/// Outcome of an [`update_if_missing`] run.
#[derive(Debug)]
pub struct BatchReport<E> {
    /// Names the generator completed for.
    pub processed: Vec<String>,
    /// Names that were skipped, with the reason.
    pub skipped: Vec<(String, SkipReason)>,
    /// Names the generator failed for.
    pub failures: Vec<BatchFailure<E>>,
}

impl<E> Default for BatchReport<E> {
    fn default() -> Self {
        Self {
            processed: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<E> BatchReport<E> {
    /// Returns `true` if no generator call failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of generator calls made.
    pub fn attempted(&self) -> usize {
        self.processed.len() + self.failures.len()
    }
}

/// Run `generate` for every named record that lacks `target_field` but has
/// `required_field`.
///
/// Records are visited one at a time in order. Records without a `Name` are
/// ignored. A generator error is logged and collected in the report; it never
/// stops the remaining records from being processed.
///
/// The generator receives the record name and is expected to fill in
/// `target_field` itself (typically by computing something and posting it
/// back with the client).
///
/// # Example
///
/// ```no_run
/// # async fn example(records: Vec<tablink_core::Record>) {
/// use tablink_client::update_if_missing;
///
/// let report = update_if_missing(&records, "QC Plot", "Raw Data", |name| async move {
///     println!("generating plot for {name}");
///     Ok::<_, std::io::Error>(())
/// })
/// .await;
/// for failure in &report.failures {
///     eprintln!("{}: {}", failure.name, failure.error);
/// }
/// # }
/// ```
pub async fn update_if_missing<F, Fut, E>(
    records: &[Record],
    target_field: &str,
    required_field: &str,
    mut generate: F,
) -> BatchReport<E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut report = BatchReport::default();

    for record in records {
        let Some(name) = record.name() else {
            continue;
        };

        if record.has_field(target_field) {
            debug!(record = %name, field = target_field, "record already has field");
            report.skipped.push((name, SkipReason::AlreadyPresent));
            continue;
        }

        if !record.has_field(required_field) {
            debug!(record = %name, field = required_field, "record is missing required field");
            report.skipped.push((name, SkipReason::MissingRequired));
            continue;
        }

        info!(
            record = %name,
            field = target_field,
            from = required_field,
            "updating missing field"
        );
        match generate(name.clone()).await {
            Ok(()) => report.processed.push(name),
            Err(error) => {
                warn!(record = %name, error = %error, "update failed");
                report.failures.push(BatchFailure { name, error });
            }
        }
    }

    report
}
