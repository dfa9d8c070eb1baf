use anyhow::{anyhow, Context, Result};
use batting_analytics::FundScorecard;
use bell_curve::{DistributionModel, DistributionOptions};
use fund_core::{FundFinalScore, ScoreStore};
use report_export::ChartOptions;
use score_store::{SnapshotInfo, SnapshotManager};
use std::path::{Path, PathBuf};
use validation::templates::DISTRIBUTION_TEMPLATE_FILE;
use validation::{RawSection, RawWorkbook};

pub const BELL_CURVE_FILE: &str = "bell_curve.svg";

/// Blank scoring workbook plus a blank distribution table.
pub fn template(out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = validation::write_scoring_template(&out_dir.join("scoring_template"))
        .context("Failed to write scoring template")?;

    let distribution = out_dir.join(DISTRIBUTION_TEMPLATE_FILE);
    validation::write_distribution_template(&distribution)
        .context("Failed to write distribution template")?;
    written.push(distribution);

    Ok(written)
}

pub struct ScoreOutcome {
    pub scorecard: FundScorecard,
    pub saved: bool,
    pub export_path: Option<PathBuf>,
}

/// Validate and score an uploaded workbook directory, then optionally export
/// the sheet and save it to the store. A failed export saves nothing.
pub async fn score(
    store: &dyn ScoreStore,
    workbook_dir: &Path,
    save: bool,
    export_dir: Option<&Path>,
) -> Result<ScoreOutcome> {
    let workbook = RawWorkbook::from_dir(workbook_dir)
        .with_context(|| format!("Failed to read workbook {}", workbook_dir.display()))?;
    let upload = validation::validate(&workbook)?;
    let scorecard = FundScorecard::score(&upload);

    let export_path = match export_dir {
        Some(dir) => Some(report_export::export_scorecard(
            &scorecard.identity.fund_name,
            &scorecard.blocks(),
            dir,
        )?),
        None => None,
    };

    if save {
        store.upsert(&scorecard.record()).await?;
        tracing::info!("Saved scores for {}", scorecard.identity.fund_name);
    }

    Ok(ScoreOutcome {
        scorecard,
        saved: save,
        export_path,
    })
}

pub async fn list(store: &dyn ScoreStore) -> Result<Vec<fund_core::FundScoreRecord>> {
    Ok(store.fetch_all().await?)
}

pub async fn delete(store: &dyn ScoreStore, fund_name: &str, confirmed: bool) -> Result<()> {
    store.delete(fund_name, confirmed).await?;
    Ok(())
}

pub async fn backup(store: &dyn ScoreStore, manager: &SnapshotManager) -> Result<PathBuf> {
    Ok(manager.create(store).await?)
}

/// Restore `file`, or the newest snapshot when none is given.
pub async fn restore(
    store: &dyn ScoreStore,
    manager: &SnapshotManager,
    file: Option<&Path>,
) -> Result<(PathBuf, usize)> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => manager
            .latest()?
            .map(|s| s.path)
            .ok_or_else(|| anyhow!("No snapshots in {}", manager.dir().display()))?,
    };
    let count = manager.restore(store, &path).await?;
    Ok((path, count))
}

pub fn snapshots(manager: &SnapshotManager) -> Result<Vec<SnapshotInfo>> {
    Ok(manager.list()?)
}

/// Final scores from a `Fund`/`Final` CSV table, or from every stored fund.
pub async fn load_final_scores(
    store: &dyn ScoreStore,
    input: Option<&Path>,
) -> Result<Vec<FundFinalScore>> {
    match input {
        Some(path) => {
            let section = RawSection::from_csv_file(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(validation::validate_final_scores(&section)?)
        }
        None => Ok(store
            .fetch_all()
            .await?
            .iter()
            .map(|r| r.to_final_score())
            .collect()),
    }
}

/// Build the distribution model and render it to `out`.
pub async fn bell_curve(
    store: &dyn ScoreStore,
    input: Option<&Path>,
    out: &Path,
    options: &DistributionOptions,
) -> Result<DistributionModel> {
    let scores = load_final_scores(store, input).await?;
    let model = bell_curve::build(&scores, options)?;
    report_export::render_bell_curve(&model, out, &ChartOptions::default())?;
    Ok(model)
}
