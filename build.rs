use std::env;

fn main() {
    // ENVIRONMENT環境変数に基づいて実行環境をコンパイル時に埋め込む
    println!("cargo:rerun-if-env-changed=ENVIRONMENT");

    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    // 注意: プロダクションビルドの場合のみ埋め込む
    // 開発ビルドでは実行時の環境変数で切り替えられるようにする
    if environment == "production" {
        println!("cargo:rustc-env=EMBEDDED_ENVIRONMENT=production");
        println!("cargo:warning=プロダクション環境としてビルドします");
    }
}
