use anyhow::{Context, Result};
use cetl::{CommentETL, ExportFormat, WhatlangDetector, YouTubeApi, API_KEY_ENV};
use std::fs;
use std::path::PathBuf;

const WORK_ROOT: &str = "./cetl_work";

const DEFAULT_VIDEOS: [&str; 5] = [
    "x9x7BbFdQbQ",
    "IWai7TRXEto",
    "zsd6UUTq0Ew",
    "s6Jw7UdJZbw",
    "-KcgQmvV97A",
];

fn main() -> Result<()> {
    let api_key = std::env::var(API_KEY_ENV)
        .with_context(|| format!("{API_KEY_ENV} must be set to a YouTube Data API key"))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let video_ids: Vec<String> = if args.is_empty() {
        DEFAULT_VIDEOS.iter().map(|s| s.to_string()).collect()
    } else {
        args
    };

    let work_dir = PathBuf::from(WORK_ROOT);
    fs::create_dir_all(&work_dir)?;

    let etl = CommentETL::new()
        .comment_limit(5000)
        .progress(true)
        .progress_label("Harvesting videos");

    let mut api = YouTubeApi::new(api_key)?;
    let report = etl.harvest(&mut api, &video_ids);
    etl.save_raw(&report.records, &work_dir.join("raw_comments.ndjson"))?;
    for v in report.aborted_videos() {
        println!("{}: aborted after {} records ({:?})", v.video_id, v.records, v.status);
    }
    println!("Total comments collected: {}", report.records.len());

    let corpus = etl.preprocess(report.records, &WhatlangDetector)?;
    etl.export_corpus(&corpus, &work_dir.join("corpus.ndjson.zst"), ExportFormat::Zst)?;
    let params = corpus.cluster_params();
    println!("English comments: {}", corpus.len());
    println!(
        "Clustering params: min_cluster_size={}, min_samples={}",
        params.min_cluster_size, params.min_samples
    );
    Ok(())
}
