// src/uploader.rs

use crate::{
    UploadJobContext,
    error::AppResult,
    models::{BatchOutcome, Target, UploadConfig, UploadedImage},
    symbols, ui, utils,
};
use colored::Colorize;
use log::{error, info, warn};
use std::path::Path;

pub struct AlbumUploader<'a> {
    context: &'a UploadJobContext,
}

impl<'a> AlbumUploader<'a> {
    pub fn new(context: &'a UploadJobContext) -> Self {
        Self { context }
    }

    /// Runs one batch: creates the album, then walks the targets in order.
    /// Album creation is the single fatal step; once it succeeds, a failing
    /// upload is reported and dropped while the rest of the batch continues.
    pub async fn run(&self) -> AppResult<BatchOutcome> {
        let args = &self.context.args;
        let title = args.title.as_deref().filter(|s| !s.is_empty());
        let description = args.description.as_deref().filter(|s| !s.is_empty());

        info!("creating album for {} target(s)", args.targets.len());
        ui::step("Creating album... ");
        let album = match self.context.client.create_album(title, description).await {
            Ok(album) => album,
            Err(e) => {
                println!("failed.");
                return Err(e);
            }
        };
        println!("done. (id: {})", album.id);

        let mut config = UploadConfig {
            album: Some(album.deletehash.clone()),
            ..Default::default()
        };
        // A one-image album shares its title and description with the image.
        if args.targets.len() == 1 {
            config.title = title.map(str::to_owned);
            config.description = description.map(str::to_owned);
        }

        let mut image_ids: Vec<String> = Vec::new();
        let mut attempted = 0usize;
        for raw in &args.targets {
            match utils::classify_target(raw) {
                Target::Url(url) => {
                    attempted += 1;
                    if let Some(image) = self.try_upload_url(&url, &config).await {
                        image_ids.push(image.id);
                    }
                }
                Target::File(path) => {
                    attempted += 1;
                    if let Some(image) = self.try_upload_path(&path, &config).await {
                        image_ids.push(image.id);
                    }
                }
                Target::Directory(dir) => {
                    // A directory that cannot be enumerated costs one
                    // diagnostic, same as a failing upload.
                    let entries = match utils::expand_directory(&dir) {
                        Ok(entries) => entries,
                        Err(e) => {
                            error!("directory expansion failed: {e}");
                            eprintln!("{} {}", *symbols::ERROR, e.to_string().red());
                            continue;
                        }
                    };
                    for entry in entries {
                        attempted += 1;
                        if let Some(image) = self.try_upload_path(&entry, &config).await {
                            image_ids.push(image.id);
                        }
                    }
                }
                Target::Invalid(raw) => {
                    warn!("skipping invalid target: {raw}");
                    eprintln!("{} Skipping invalid target: {}", *symbols::WARN, raw);
                }
            }
        }

        info!(
            "album {} finished: {}/{} uploads succeeded",
            album.id,
            image_ids.len(),
            attempted
        );
        let failed = attempted - image_ids.len();
        if attempted == 0 {
            println!("\n{} No uploadable targets were found.", *symbols::INFO);
        } else if failed == 0 {
            println!("\n{} All {} upload(s) succeeded.", *symbols::OK, image_ids.len());
        } else {
            println!(
                "\n{} | {}",
                format!("uploaded: {}", image_ids.len()).green(),
                format!("failed: {}", failed).red()
            );
        }

        Ok(BatchOutcome {
            album_id: album.id,
            image_ids,
        })
    }

    async fn try_upload_url(&self, url: &str, config: &UploadConfig) -> Option<UploadedImage> {
        ui::step(&format!("Uploading {}... ", url));
        self.report(self.context.client.upload_from_url(url, config).await)
    }

    async fn try_upload_path(&self, path: &Path, config: &UploadConfig) -> Option<UploadedImage> {
        ui::step(&format!("Uploading {}... ", path.display()));
        self.report(self.context.client.upload_from_path(path, config).await)
    }

    /// Prints the per-upload outcome and converts failures into `None`.
    fn report(&self, result: AppResult<UploadedImage>) -> Option<UploadedImage> {
        match result {
            Ok(image) => {
                println!("done. (id: {})", image.id);
                Some(image)
            }
            Err(e) => {
                println!("failed.");
                error!("upload failed: {e}");
                eprintln!("{} {}", *symbols::ERROR, e.to_string().red());
                None
            }
        }
    }
}
