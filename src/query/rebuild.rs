//! Label block reconstruction

use super::matcher::{classify, Verdict};
use super::splitter::split_matchers;

/// Outcome of cleaning one label block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rebuilt {
    /// No matcher survived; the block and its braces disappear
    Remove,
    /// Rewritten block, braces included
    Block(String),
}

impl Rebuilt {
    /// Text to emit in place of the original block
    pub fn as_str(&self) -> &str {
        match self {
            Rebuilt::Remove => "",
            Rebuilt::Block(block) => block,
        }
    }
}

/// Rebuild a block from the fragments that were kept, in order
pub fn rebuild<'a, I>(kept: I) -> Rebuilt
where
    I: IntoIterator<Item = &'a str>,
{
    let kept: Vec<&str> = kept.into_iter().collect();
    if kept.is_empty() {
        return Rebuilt::Remove;
    }
    Rebuilt::Block(format!("{{{}}}", kept.join(", ")))
}

/// Split, classify and rebuild a non-nested block interior
pub fn clean_block(interior: &str) -> Rebuilt {
    let fragments = split_matchers(interior);
    let total = fragments.len();

    let rebuilt = rebuild(
        fragments
            .into_iter()
            .filter(|fragment| classify(fragment) == Verdict::Keep),
    );

    if rebuilt == Rebuilt::Remove {
        tracing::debug!(
            matchers = total,
            "Removing label block with no remaining matchers"
        );
    }
    rebuilt
}
