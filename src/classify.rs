//! Classifying why an installed formula is not linked
//!
//! A rack is reported when it has no linked-keg entry and its formula is not
//! known to be keg-only. Each reported rack then gets exactly one reason,
//! taken from the first rule in [`RULES`] that matches:
//!
//! 1. formula metadata cannot be loaded
//! 2. the rack holds no keg
//! 3. a file in the prefix blocks the keg
//! 4. a declared conflict is installed and linked
//!
//! and `manually unlinked` when none do. File conflicts come before declared
//! ones because a declaration may be stale while an occupied path is not.

use crate::api::{DeclaredConflict, Formula};
use crate::cellar::{self, Layout};
use crate::conflict::{self, FileConflict};
use crate::error::Result;
use crate::formulary::{self, FormulaSource, MetadataError};
use crate::keg::Keg;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlinkReason {
    FormulaUnavailable,
    NoKeg,
    ExternalFile(String),
    Conflict(String),
    DeclaredConflict {
        name: String,
        reason: Option<String>,
    },
    ManuallyUnlinked,
}

impl fmt::Display for UnlinkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnlinkReason::FormulaUnavailable => write!(f, "formula unavailable"),
            UnlinkReason::NoKeg => write!(f, "no keg found"),
            UnlinkReason::ExternalFile(name) => write!(f, "conflict: external file ({})", name),
            UnlinkReason::Conflict(owner) => write!(f, "conflict: {}", owner),
            UnlinkReason::DeclaredConflict { name, reason } => {
                write!(f, "declared conflict: {}", name)?;
                if let Some(reason) = reason {
                    write!(f, " ({})", reason)?;
                }
                Ok(())
            }
            UnlinkReason::ManuallyUnlinked => write!(f, "manually unlinked"),
        }
    }
}

impl Serialize for UnlinkReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<FileConflict> for UnlinkReason {
    fn from(conflict: FileConflict) -> Self {
        match conflict {
            FileConflict::ExternalFile(name) => UnlinkReason::ExternalFile(name),
            FileConflict::Keg(owner) => UnlinkReason::Conflict(owner),
        }
    }
}

impl From<DeclaredConflict> for UnlinkReason {
    fn from(conflict: DeclaredConflict) -> Self {
        UnlinkReason::DeclaredConflict {
            name: conflict.name,
            reason: conflict.reason,
        }
    }
}

type Lookup = std::result::Result<Formula, MetadataError>;

/// Everything the rules look at for one rack, read once up front
struct Subject<'a> {
    name: &'a str,
    formula: &'a Lookup,
    keg: Option<Keg>,
}

type Rule = fn(&Classifier<'_>, &Subject<'_>) -> Option<UnlinkReason>;

/// Checked top to bottom; the first `Some` wins
const RULES: &[(&str, Rule)] = &[
    ("metadata", formula_unavailable),
    ("keg", no_keg),
    ("file conflict", file_conflict),
    ("declared conflict", declared_conflict),
];

fn formula_unavailable(_: &Classifier<'_>, subject: &Subject<'_>) -> Option<UnlinkReason> {
    subject
        .formula
        .is_err()
        .then_some(UnlinkReason::FormulaUnavailable)
}

fn no_keg(_: &Classifier<'_>, subject: &Subject<'_>) -> Option<UnlinkReason> {
    subject.keg.is_none().then_some(UnlinkReason::NoKeg)
}

fn file_conflict(classifier: &Classifier<'_>, subject: &Subject<'_>) -> Option<UnlinkReason> {
    let keg = subject.keg.as_ref()?;
    conflict::find_file_conflict(classifier.layout, keg).map(UnlinkReason::from)
}

fn declared_conflict(classifier: &Classifier<'_>, subject: &Subject<'_>) -> Option<UnlinkReason> {
    let formula = subject.formula.as_ref().ok()?;
    conflict::find_declared_conflict(classifier.layout, classifier.source, formula)
        .map(UnlinkReason::from)
}

pub struct Classifier<'a> {
    layout: &'a Layout,
    source: &'a dyn FormulaSource,
}

impl<'a> Classifier<'a> {
    pub fn new(layout: &'a Layout, source: &'a dyn FormulaSource) -> Self {
        Self { layout, source }
    }

    /// Whether a rack belongs in the report.
    pub fn is_unlinked(&self, rack: &str) -> bool {
        self.screen(rack).is_some()
    }

    /// The rack's metadata lookup if it belongs in the report, `None` if not.
    ///
    /// The linked check runs first so a failing metadata lookup can never
    /// affect a rack that is plainly linked, and linked racks cost no lookup.
    fn screen(&self, rack: &str) -> Option<Lookup> {
        if cellar::is_linked(self.layout, rack) {
            return None;
        }

        let lookup = self.source.load(rack);
        if formulary::keg_only_status(rack, &lookup).excludes() {
            return None;
        }

        Some(lookup)
    }

    pub fn classify(&self, rack: &str) -> UnlinkReason {
        self.classify_loaded(rack, &self.source.load(rack))
    }

    fn classify_loaded(&self, rack: &str, formula: &Lookup) -> UnlinkReason {
        let subject = Subject {
            name: rack,
            formula,
            keg: cellar::current_keg(self.layout, rack),
        };

        RULES
            .iter()
            .find_map(|(rule, check)| {
                let reason = check(self, &subject)?;
                tracing::debug!("{}: {} rule matched: {}", subject.name, rule, reason);
                Some(reason)
            })
            .unwrap_or(UnlinkReason::ManuallyUnlinked)
    }
}

/// What to compute for each reported rack
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub desc: bool,
    pub reason: bool,
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlinkedFormula {
    pub name: String,
    pub desc: Option<String>,
    pub reason: Option<UnlinkReason>,
}

/// List unlinked, non-keg-only racks sorted by name.
///
/// Racks are independent of each other and are classified in parallel.
/// Each reported rack's metadata is looked up once and shared by the
/// keg-only check, the description and the reason.
pub fn find_unlinked(
    layout: &Layout,
    source: &dyn FormulaSource,
    options: ReportOptions,
) -> Result<Vec<UnlinkedFormula>> {
    let racks = cellar::list_racks(layout)?;
    let classifier = Classifier::new(layout, source);

    let mut unlinked: Vec<UnlinkedFormula> = racks
        .par_iter()
        .filter_map(|rack| {
            let formula = classifier.screen(rack)?;
            let reason = options
                .reason
                .then(|| classifier.classify_loaded(rack, &formula));
            let desc = if options.desc {
                formula.ok().and_then(|f| f.desc)
            } else {
                None
            };

            Some(UnlinkedFormula {
                name: rack.clone(),
                desc,
                reason,
            })
        })
        .collect();

    unlinked.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!("{} of {} racks unlinked", unlinked.len(), racks.len());

    Ok(unlinked)
}
