//! Interface lookup over the platform parsers
//!
//! Resolves user-supplied target identifiers into interface records.
//! Records are built fresh from the OS on every call; nothing is
//! cached between invocations.

use crate::{
    command::CommandRunner,
    error::Result,
    parser::{interface_parser, InterfaceParser, InterfaceRecord, TargetSet},
    platform::Platform,
};

/// Exposes `find_all` / `find_one` over the platform's parser
pub struct InterfaceDirectory {
    parser: Box<dyn InterfaceParser>,
}

impl InterfaceDirectory {
    pub fn new(platform: Platform) -> Self {
        Self {
            parser: interface_parser(platform),
        }
    }

    /// All discovered interfaces matching `targets`; an empty target
    /// set returns everything.
    pub async fn find_all(
        &self,
        runner: &dyn CommandRunner,
        targets: &TargetSet,
    ) -> Result<Vec<InterfaceRecord>> {
        self.parser.discover(runner, targets).await
    }

    /// The first interface matching `target`, or `None`. A missing
    /// device is never an error here; callers decide whether absence
    /// is fatal.
    pub async fn find_one(
        &self,
        runner: &dyn CommandRunner,
        target: &str,
    ) -> Result<Option<InterfaceRecord>> {
        let targets = TargetSet::new([target]);
        let mut records = self.parser.discover(runner, &targets).await?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.remove(0)))
        }
    }
}
