use clap::{Parser, Subcommand};
use cosmo_cuisine_common::Field;
use crate::matcher::MatchMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cosmo-cuisine")]
#[command(about = "パッケージ写真・音声から商品カタログを照合するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// カタログファイル（省略時は環境変数・設定ファイル・既定の場所の順）
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// products.json からカタログをインポート（全件入れ替え）
    Import {
        /// 商品JSONファイル
        #[arg(required = true)]
        source: PathBuf,

        /// 商品画像フォルダ
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// 前回と同じ内容でも再インポートする
        #[arg(long)]
        force: bool,
    },

    /// カタログの件数を表示
    Count,

    /// 認識した文字列でカタログを照合
    Match {
        /// 問い合わせ文字列
        queries: Vec<String>,

        /// 対象フィールド (brand-jp/brand-us/category-jp/category-us)
        #[arg(short, long)]
        field: Option<Field>,

        /// 照合方式 (auto/exact/contains/substring/edit/substring-edit)
        #[arg(short, long)]
        tier: Option<MatchMode>,

        /// OCR結果ファイル（1行1文字列）
        #[arg(long)]
        ocr: Option<PathBuf>,

        /// 音声認識の書き起こし
        #[arg(long)]
        transcript: Option<String>,

        /// ページあたりの件数（0で全件）
        #[arg(short, long)]
        limit: Option<usize>,

        /// 表示するページ（1始まり）
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 複数の照合リクエストを並列に実行
    Batch {
        /// リクエストJSONファイル（配列）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 対象フィールドの既定値
        #[arg(short, long)]
        field: Option<Field>,
    },

    /// カタログを全件削除
    Clear {
        /// 確認せずに削除
        #[arg(short, long)]
        yes: bool,
    },

    /// 設定を表示/編集
    Config {
        /// カタログファイルの場所を設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// 商品画像フォルダを設定
        #[arg(long)]
        set_assets: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
