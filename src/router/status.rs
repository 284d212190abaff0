//! Status snapshot reported to the control surface.

use std::fmt;

use super::category::Category;
use super::state::SoundState;

/// Presence and approximate size of one category's asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetStatus {
    pub category: Category,
    /// `None` when no asset is bound.
    pub size_kb: Option<f64>,
}

/// Everything the "show status" action reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub enabled: bool,
    pub assets: Vec<AssetStatus>,
    pub learned_count: usize,
    pub pending_tag: Option<Category>,
}

impl Status {
    pub fn from_state(state: &SoundState) -> Self {
        Self {
            enabled: state.enabled(),
            assets: state
                .slots()
                .iter()
                .map(|slot| AssetStatus {
                    category: slot.category.clone(),
                    size_kb: slot.asset.as_ref().map(|a| a.approx_size_kb()),
                })
                .collect(),
            learned_count: state.learned().len(),
            pending_tag: state.pending_tag().cloned(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Enabled: {}", if self.enabled { "Yes" } else { "No" })?;
        for asset in &self.assets {
            match asset.size_kb {
                Some(kb) => writeln!(f, "{} sound: Loaded ({kb:.1} KB)", asset.category.label())?,
                None => writeln!(f, "{} sound: Not set", asset.category.label())?,
            }
        }
        write!(f, "Learned tags: {}", self.learned_count)?;
        if let Some(tag) = &self.pending_tag {
            write!(f, "\nTag mode: {tag}")?;
        }
        Ok(())
    }
}
