use std::path::PathBuf;

/// 1回のドキュメントスキャンを制御するオプション。
///
/// CLIフラグから組み立てる。デフォルトはテキストレポートのみ
/// （JSON出力なし・画像データ書き出しなし）。
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// テキストレポートの代わりにJSONレポートをstdoutへ出力する。
    pub json: bool,
    /// 指定時、遭遇した各画像XObjectのデータをこのディレクトリへ書き出す。
    pub extract_dir: Option<PathBuf>,
}
