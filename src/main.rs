use anyhow::Context;
use clap::Parser;
use cosmo_cuisine_common::{CatalogStore, ImageResolver, NoImages, QuerySet};
use cosmo_cuisine_rust::{cli, config, importer, matcher, store};
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use matcher::{MatchMode, ProductSummary};
use std::path::PathBuf;
use store::JsonCatalogStore;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("設定ファイルを読み込めません")?;
    let catalog_path = config.resolve_catalog_path(cli.catalog.clone())?;

    match cli.command {
        Commands::Import { source, assets, force } => {
            println!("📦 cosmo-cuisine - カタログインポート\n");

            let mut store = JsonCatalogStore::open(&catalog_path)
                .with_context(|| format!("カタログを開けません: {}", catalog_path.display()))?;

            let assets = assets.or_else(|| config.assets_dir.clone());
            let resolver: Box<dyn ImageResolver> = match assets {
                Some(dir) => {
                    let resolver = importer::AssetImageResolver::scan(&dir)?;
                    println!("✔ 画像フォルダ: {} ({}件)", dir.display(), resolver.len());
                    Box::new(resolver)
                }
                None => Box::new(NoImages),
            };

            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
                    .progress_chars("##-"),
            );

            let summary = importer::import_file(&mut store, &source, resolver.as_ref(), force, |done, total| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            })
            .with_context(|| format!("インポートに失敗: {}", source.display()))?;
            bar.finish_and_clear();

            if summary.unchanged {
                println!("✔ カタログは最新です（{}件）。再インポートは --force", summary.count);
            } else {
                println!("✔ {}件中 {}件を追加", summary.total, summary.inserted);
                if summary.skipped > 0 {
                    println!("⚠ {}件を読み飛ばしました", summary.skipped);
                }
                println!("✔ カタログ件数: {}", summary.count);
                println!("✔ 保存先: {}", catalog_path.display());
            }

            println!("\n✅ インポート完了");
        }

        Commands::Count => {
            let store = JsonCatalogStore::open(&catalog_path)?;
            println!("カタログ: {}", catalog_path.display());
            println!("  件数: {}", store.count_records()?);
            if let Some(imported_at) = store.imported_at() {
                println!("  インポート日時: {}", imported_at);
            }
            if store.skipped() > 0 {
                println!("  読み飛ばしたレコード: {}", store.skipped());
            }
        }

        Commands::Match { queries, field, tier, ocr, transcript, limit, page, json } => {
            let field = field.unwrap_or(config.default_field);
            let mode = tier.unwrap_or_else(|| MatchMode::from(config.default_tier));
            let page_size = limit.unwrap_or(config.page_size);

            let mut query_set = QuerySet::new(queries);
            if let Some(path) = ocr {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("OCR結果を読み込めません: {}", path.display()))?;
                query_set.extend(QuerySet::from_ocr_lines(&text));
            }
            if let Some(text) = transcript {
                query_set.extend(QuerySet::from_transcript(&text));
            }

            // 問い合わせが空ならカタログを開かない
            let outcome = if query_set.is_empty() {
                matcher::MatchOutcome::default()
            } else {
                let store = JsonCatalogStore::open(&catalog_path)?;
                matcher::run_match(&store, &query_set, field, mode)?
            };

            let summaries: Vec<ProductSummary> = outcome.records.iter().map(ProductSummary::from).collect();
            let shown = matcher::paginate(&summaries, page, page_size);

            if json {
                let value = serde_json::json!({
                    "field": field,
                    "tier": outcome.tier,
                    "total": summaries.len(),
                    "page": page.max(1),
                    "pages": matcher::page_count(summaries.len(), page_size),
                    "matches": shown,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if summaries.is_empty() {
                println!("一致する商品はありません（{}件の問い合わせ, {}）", query_set.len(), field);
            } else {
                let tier = outcome.tier.map(|t| t.to_string()).unwrap_or_default();
                println!(
                    "🔍 {}件一致（フィールド: {}, 方式: {}）ページ {}/{}",
                    summaries.len(),
                    field,
                    tier,
                    page.max(1),
                    matcher::page_count(summaries.len(), page_size)
                );
                for summary in shown {
                    println!("  {}", summary);
                }
            }
        }

        Commands::Batch { input, output, field } => {
            let store = JsonCatalogStore::open(&catalog_path)?;
            let requests = matcher::load_batch(&input)?;
            let field = field.unwrap_or(config.default_field);

            let results = matcher::run_batch(&store, &requests, field);
            let failed = results.iter().filter(|r| r.error.is_some()).count();
            let json = serde_json::to_string_pretty(&results)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("✔ {}件を照合（失敗 {}件）: {}", results.len(), failed, path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Clear { yes } => {
            let mut store = JsonCatalogStore::open(&catalog_path)?;
            let count = store.count_records()?;

            let confirmed = yes
                || dialoguer::Confirm::new()
                    .with_prompt(format!("カタログ（{}件）を全件削除しますか？", count))
                    .default(false)
                    .interact()?;

            if confirmed {
                store.delete_all()?;
                store.save()?;
                println!("✔ カタログを削除しました: {}", catalog_path.display());
            } else {
                println!("中止しました");
            }
        }

        Commands::Config { set_catalog, set_assets, show } => {
            let mut config = config;

            if let Some(path) = set_catalog {
                config.set_catalog_path(absolute(path))?;
                println!("✔ カタログの場所を設定しました");
            }

            if let Some(dir) = set_assets {
                config.set_assets_dir(absolute(dir))?;
                println!("✔ 画像フォルダを設定しました");
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  カタログ: {}", catalog_path.display());
                println!(
                    "  画像フォルダ: {}",
                    config
                        .assets_dir
                        .as_ref()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  既定フィールド: {}", config.default_field);
                println!("  既定の照合方式: {}", MatchMode::from(config.default_tier));
                println!("  ページあたり件数: {}", config.page_size);
            }
        }
    }

    Ok(())
}

/// ログ出力を初期化（`--verbose` ならdebug、それ以外は RUST_LOG か warn）
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn absolute(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}
