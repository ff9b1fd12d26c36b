// Work Unit Builders - parsed pipeline output into a WorkUnit variant

use crate::domain::{DataCollection, WorkUnit, WorkUnitKind};
use crate::error::{AppError, Result};
use crate::port::Parser;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Builds one WorkUnit variant from a backing file
#[async_trait]
pub trait WorkUnitBuilder: Send + Sync {
    /// Granularity of the units this builder produces
    fn kind(&self) -> WorkUnitKind;

    fn parser(&self) -> &dyn Parser;

    /// Parse `full_path` and wrap the result as this builder's variant
    ///
    /// # Errors
    /// - AppError::Parse propagated unchanged from the parser
    /// - AppError::Domain (EmptyCollection) if the file holds no sources or
    ///   a source without readings
    async fn build_workunit(&self, full_path: &Path) -> Result<WorkUnit> {
        let filename = full_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                AppError::Validation(format!("no file name in '{}'", full_path.display()))
            })?
            .to_string();

        let parsed = self.parser().parse(full_path).await?;
        let data = DataCollection::new(parsed)?;
        let unit = WorkUnit::new(filename, self.kind(), data);

        info!(
            filename = %unit.filename(),
            kind = %unit.kind(),
            sources = unit.source_count(),
            items = unit.item_count(),
            "Work unit built"
        );
        Ok(unit)
    }
}

/// Source-level vetting: one item per source
pub struct CandidatesWorkUnitBuilder {
    parser: Arc<dyn Parser>,
}

impl CandidatesWorkUnitBuilder {
    pub fn new(parser: Arc<dyn Parser>) -> Self {
        Self { parser }
    }
}

impl WorkUnitBuilder for CandidatesWorkUnitBuilder {
    fn kind(&self) -> WorkUnitKind {
        WorkUnitKind::Candidates
    }

    fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }
}

/// Reading-level vetting: one item per (source, reading) pair
pub struct RealsWorkUnitBuilder {
    parser: Arc<dyn Parser>,
}

impl RealsWorkUnitBuilder {
    pub fn new(parser: Arc<dyn Parser>) -> Self {
        Self { parser }
    }
}

impl WorkUnitBuilder for RealsWorkUnitBuilder {
    fn kind(&self) -> WorkUnitKind {
        WorkUnitKind::Reals
    }

    fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }
}

/// Builder for the requested granularity
pub fn builder_for(kind: WorkUnitKind, parser: Arc<dyn Parser>) -> Arc<dyn WorkUnitBuilder> {
    match kind {
        WorkUnitKind::Candidates => Arc::new(CandidatesWorkUnitBuilder::new(parser)),
        WorkUnitKind::Reals => Arc::new(RealsWorkUnitBuilder::new(parser)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, ParsedData, Reading, Source};
    use crate::port::parser::mocks::StaticParser;
    use crate::port::ParseError;
    use std::path::PathBuf;

    fn parsed(counts: &[usize]) -> ParsedData {
        ParsedData::new(
            counts
                .iter()
                .map(|&n| {
                    Source::new(
                        (0..n)
                            .map(|r| Reading::new(format!("frame-{}", r), 1.0, 2.0))
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    fn parser() -> Arc<dyn Parser> {
        Arc::new(
            StaticParser::new()
                .with_file("field.cands.astrom", parsed(&[2, 3, 1]))
                .with_file("empty.cands.astrom", parsed(&[]))
                .with_file("hollow.cands.astrom", parsed(&[2, 0])),
        )
    }

    #[tokio::test]
    async fn test_reals_builder_flattens_readings() {
        let builder = RealsWorkUnitBuilder::new(parser());
        let unit = builder
            .build_workunit(Path::new("/data/field.cands.astrom"))
            .await
            .unwrap();

        assert_eq!(unit.kind(), WorkUnitKind::Reals);
        assert_eq!(unit.filename(), "field.cands.astrom");
        assert_eq!(unit.item_count(), 6);
    }

    #[tokio::test]
    async fn test_candidates_builder_one_item_per_source() {
        let builder = CandidatesWorkUnitBuilder::new(parser());
        let unit = builder
            .build_workunit(Path::new("/data/field.cands.astrom"))
            .await
            .unwrap();

        assert_eq!(unit.kind(), WorkUnitKind::Candidates);
        assert_eq!(unit.item_count(), 3);
        assert_eq!(unit.source_count(), 3);
    }

    #[tokio::test]
    async fn test_builder_parses_the_full_path_once() {
        let parser = Arc::new(StaticParser::new().with_file("field.cands.astrom", parsed(&[1])));
        let builder = CandidatesWorkUnitBuilder::new(parser.clone());

        let unit = builder
            .build_workunit(Path::new("/data/night-1/field.cands.astrom"))
            .await
            .unwrap();

        assert_eq!(unit.filename(), "field.cands.astrom");
        assert_eq!(
            parser.parsed_paths(),
            vec![PathBuf::from("/data/night-1/field.cands.astrom")]
        );
    }

    #[tokio::test]
    async fn test_parse_error_propagates() {
        let builder = builder_for(WorkUnitKind::Candidates, parser());
        let err = builder
            .build_workunit(&PathBuf::from("/data/missing.cands.astrom"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Parse(ParseError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_empty_file_is_not_a_work_unit() {
        let builder = builder_for(WorkUnitKind::Reals, parser());

        let err = builder
            .build_workunit(Path::new("/data/empty.cands.astrom"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::EmptyCollection(_))
        ));

        let err = builder
            .build_workunit(Path::new("/data/hollow.cands.astrom"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::EmptyCollection(_))
        ));
    }
}
