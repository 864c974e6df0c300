//! Sound file decoding via symphonia.

use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AudioError;

/// Mono PCM samples at the file's native rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Clip {
    /// Scale every sample by `gain`, clamped to 0.0..=1.0.
    pub fn apply_gain(&mut self, gain: f32) {
        let gain = gain.clamp(0.0, 1.0);
        for sample in &mut self.samples {
            *sample *= gain;
        }
    }
}

/// Decode a sound file, averaging multi-channel audio down to mono.
pub fn decode_mono(path: &Path) -> Result<Clip, AudioError> {
    let failed = |message: String| AudioError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let file = std::fs::File::open(path).map_err(|e| failed(e.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| failed(format!("unrecognised format: {e}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| failed("no audio track".into()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| failed("unknown sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| failed(format!("no decoder: {e}")))?;

    let mut samples = Vec::new();
    let mut buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(failed(format!("read error: {e}"))),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt frame; skip it.
            Err(SymphError::DecodeError(_)) => continue,
            Err(e) => return Err(failed(format!("decode error: {e}"))),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let frames = decoded.frames() as u64;
        let needed = (frames as usize).saturating_mul(channels);

        if buf.as_ref().map_or(true, |b| b.capacity() < needed) {
            buf = Some(SampleBuffer::<f32>::new(frames, spec));
        }
        let Some(sample_buf) = buf.as_mut() else {
            continue;
        };
        sample_buf.copy_interleaved_ref(decoded);

        let data = sample_buf.samples();
        if channels == 1 {
            samples.extend_from_slice(data);
        } else {
            samples.extend(
                data.chunks_exact(channels)
                    .map(|frame| frame.iter().sum::<f32>() / channels as f32),
            );
        }
    }

    Ok(Clip {
        samples,
        sample_rate,
    })
}
