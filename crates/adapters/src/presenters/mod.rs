use gifstudio_domain::{FileDetails, JobMetrics};

pub fn present_details(details: &FileDetails) -> String {
    format!(
        "{} | {} frame(s) | {} | {}",
        details.format, details.frame_count, details.file_size, details.dimensions
    )
}

pub fn present_metrics(metrics: JobMetrics) -> String {
    format!(
        "jobs s/c/f/d={}/{}/{}/{}",
        metrics.submitted, metrics.completed, metrics.failed, metrics.stale_dropped
    )
}
