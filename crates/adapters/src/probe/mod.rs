use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use gifstudio_application::{ApplicationError, ProbeEvent, SourceInspector};
use gifstudio_domain::{
    format_dimensions, format_file_size, FileDetails, ProbeReply, ProbeRequest,
};
use image::{AnimationDecoder, ImageFormat, ImageReader};

/// Derives the display details for one file: detected format as a MIME
/// string, pixel dimensions, size in KB, and the real frame count (animated
/// GIFs report their actual number of frames; everything else reports 1).
pub fn probe_file(path: &Path) -> Result<FileDetails, ApplicationError> {
    let metadata = std::fs::metadata(path)
        .map_err(|error| ApplicationError::Io(error.to_string()))?;

    let reader = ImageReader::open(path)
        .map_err(|error| ApplicationError::Io(error.to_string()))?
        .with_guessed_format()
        .map_err(|error| ApplicationError::Io(error.to_string()))?;
    let format = reader.format().ok_or_else(|| {
        ApplicationError::Decode(format!("unrecognized image format: {}", path.display()))
    })?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|error| ApplicationError::Decode(error.to_string()))?;

    let frame_count = if format == ImageFormat::Gif {
        count_gif_frames(path)?
    } else {
        1
    };

    Ok(FileDetails {
        format: format.to_mime_type().to_string(),
        frame_count,
        file_size: format_file_size(metadata.len()),
        dimensions: format_dimensions(width, height),
    })
}

fn count_gif_frames(path: &Path) -> Result<u32, ApplicationError> {
    let file = File::open(path).map_err(|error| ApplicationError::Io(error.to_string()))?;
    let decoder = image::codecs::gif::GifDecoder::new(BufReader::new(file))
        .map_err(|error| ApplicationError::Decode(error.to_string()))?;
    let frames = decoder
        .into_frames()
        .take_while(|frame| frame.is_ok())
        .count();
    Ok(frames.max(1) as u32)
}

/// Probing happens off the UI thread; a superseded request still sitting in
/// the queue is skipped, and the service drops stale replies by token.
pub struct BackgroundSourceInspector {
    submit_tx: mpsc::Sender<ProbeRequest>,
    event_rx: Mutex<mpsc::Receiver<ProbeEvent>>,
}

impl BackgroundSourceInspector {
    pub fn new() -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<ProbeRequest>();
        let (event_tx, event_rx) = mpsc::channel::<ProbeEvent>();
        spawn_worker(submit_rx, event_tx);
        Self {
            submit_tx,
            event_rx: Mutex::new(event_rx),
        }
    }
}

impl Default for BackgroundSourceInspector {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_worker(submit_rx: mpsc::Receiver<ProbeRequest>, event_tx: mpsc::Sender<ProbeEvent>) {
    thread::spawn(move || {
        while let Ok(mut request) = submit_rx.recv() {
            while let Ok(next) = submit_rx.try_recv() {
                log::debug!("skipping superseded probe token={}", request.token);
                request = next;
            }

            let event = match probe_file(&request.path) {
                Ok(details) => ProbeEvent::Completed(ProbeReply {
                    token: request.token,
                    details,
                }),
                Err(error) => ProbeEvent::Failed {
                    token: request.token,
                    message: error.to_string(),
                },
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
    });
}

impl SourceInspector for BackgroundSourceInspector {
    fn submit(&self, request: ProbeRequest) -> Result<(), ApplicationError> {
        self.submit_tx.send(request).map_err(|error| {
            ApplicationError::Io(format!("failed to enqueue probe: {error}"))
        })
    }

    fn try_receive(&self) -> Result<Option<ProbeEvent>, ApplicationError> {
        let receiver = self
            .event_rx
            .lock()
            .map_err(|_| ApplicationError::Io("probe event lock poisoned".to_string()))?;
        match receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ApplicationError::Io(
                "probe worker disconnected".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use image::codecs::gif::GifEncoder;
    use image::{Frame, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    fn write_png(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("still.png");
        let img = RgbImage::from_pixel(64, 32, Rgb([12, 34, 56]));
        img.save(&path).expect("save png");
        path
    }

    fn write_gif(dir: &TempDir, frames: u8) -> std::path::PathBuf {
        let path = dir.path().join("anim.gif");
        let file = File::create(&path).expect("create gif");
        let mut encoder = GifEncoder::new(file);
        encoder
            .encode_frames((0..frames).map(|step| {
                Frame::new(RgbaImage::from_pixel(20, 10, Rgba([step * 40, 0, 0, 255])))
            }))
            .expect("encode frames");
        path
    }

    #[test]
    fn probes_a_still_image() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_png(&dir);

        let details = probe_file(&path).expect("probe");

        assert_eq!(details.format, "image/png");
        assert_eq!(details.frame_count, 1);
        assert_eq!(details.dimensions, "64x32");
        assert!(details.file_size.ends_with(" KB"));
    }

    #[test]
    fn counts_real_gif_frames() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_gif(&dir, 3);

        let details = probe_file(&path).expect("probe");

        assert_eq!(details.format, "image/gif");
        assert_eq!(details.frame_count, 3);
        assert_eq!(details.dimensions, "20x10");
    }

    #[test]
    fn rejects_files_that_are_not_images() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not an image").expect("write");

        assert!(matches!(
            probe_file(&path),
            Err(ApplicationError::Decode(_))
        ));
    }

    #[test]
    fn background_inspector_replies_with_the_request_token() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_gif(&dir, 2);
        let inspector = BackgroundSourceInspector::new();

        inspector
            .submit(ProbeRequest { token: 5, path })
            .expect("submit");

        let event = (0..100)
            .find_map(|_| {
                let received = inspector.try_receive().expect("receive");
                if received.is_none() {
                    thread::sleep(Duration::from_millis(5));
                }
                received
            })
            .expect("probe event in time");

        match event {
            ProbeEvent::Completed(reply) => {
                assert_eq!(reply.token, 5);
                assert_eq!(reply.details.frame_count, 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
