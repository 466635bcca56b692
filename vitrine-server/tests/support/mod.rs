#![allow(dead_code)]

use std::io::Cursor;

use anyhow::Result;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use vitrine_server::{
    AppState,
    app::create_app,
    infra::config::{ConfigLoader, ConfigMetadata, sources::EnvConfig},
};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    _tempdir: TempDir,
}

/// Environment pointing the catalog and upload directory into `tempdir`.
pub fn test_env(tempdir: &TempDir) -> EnvConfig {
    EnvConfig {
        database_url: Some(format!(
            "sqlite://{}",
            tempdir.path().join("gallery.db").display()
        )),
        upload_root: Some(tempdir.path().join("uploads")),
        server_host: Some("127.0.0.1".into()),
        ..EnvConfig::default()
    }
}

pub async fn build_test_app() -> Result<TestApp> {
    build_test_app_with(|env| env).await
}

pub async fn build_test_app_with(
    customize: impl FnOnce(EnvConfig) -> EnvConfig,
) -> Result<TestApp> {
    let tempdir = tempfile::tempdir()?;
    let env = customize(test_env(&tempdir));
    let (config, _warnings) =
        ConfigLoader::compose(None, env, ConfigMetadata::default())?;

    let state = AppState::initialize(config).await?;
    let server = TestServer::builder()
        .http_transport()
        .build(create_app(state.clone()))
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        state,
        _tempdir: tempdir,
    })
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(40, 30, Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn png_part(name: &str) -> Part {
    Part::bytes(png_bytes())
        .file_name(name.to_string())
        .mime_type("image/png")
}

pub fn upload_form(names: &[&str]) -> MultipartForm {
    names
        .iter()
        .fold(MultipartForm::new(), |form, name| {
            form.add_part("files", png_part(name))
        })
}
