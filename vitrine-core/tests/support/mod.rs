#![allow(dead_code)]

use std::{io::Cursor, sync::Arc};

use anyhow::Result;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use url::Url;
use vitrine_core::{
    CatalogDatabase, CatalogRepository, FileStore, ImageService,
    LocalFileStore, PublicUrlMapper, TextRenderer, UploadFile, UploadOptions,
};

pub struct Harness {
    pub service: ImageService,
    pub database: CatalogDatabase,
    pub files: Arc<LocalFileStore>,
    _tempdir: TempDir,
}

impl Harness {
    pub fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.database.catalog()
    }
}

pub async fn database(tempdir: &TempDir) -> Result<CatalogDatabase> {
    let url = format!(
        "sqlite://{}",
        tempdir.path().join("catalog.db").display()
    );
    let database = CatalogDatabase::connect(&url).await?;
    database.initialize_schema().await?;
    Ok(database)
}

pub fn file_store(tempdir: &TempDir) -> Result<LocalFileStore> {
    let urls = PublicUrlMapper::new(
        Url::parse("http://localhost:8000/")?,
        "/uploads",
    )?;
    Ok(LocalFileStore::new(tempdir.path().join("uploads"), urls))
}

pub async fn harness(options: UploadOptions) -> Result<Harness> {
    let tempdir = tempfile::tempdir()?;
    let database = database(&tempdir).await?;
    let files = Arc::new(file_store(&tempdir)?);
    files.ensure_root().await?;

    let service = ImageService::new(
        database.catalog(),
        files.clone() as Arc<dyn FileStore>,
        Arc::new(TextRenderer::Bitmap),
        options,
    );

    Ok(Harness {
        service,
        database,
        files,
        _tempdir: tempdir,
    })
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8())
        .write_to(&mut out, ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, format)
        .expect("encode test image");
    out.into_inner()
}

pub fn png(name: &str) -> UploadFile {
    UploadFile::new(name, png_bytes(32, 24))
}

/// Number of regular files in the upload directory.
pub fn stored_file_count(files: &LocalFileStore) -> usize {
    std::fs::read_dir(files.root())
        .map(|dir| {
            dir.filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
