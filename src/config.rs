// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::classifier::VEHICLE_TAXONOMY;
use crate::telemetry::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
    pub input_width: usize,
    pub input_height: usize,
    pub num_threads: usize,
    /// Label table mapping class index to name. Defaults to COCO-80,
    /// the layout the stock detection models are trained on.
    pub class_names: Vec<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "yolov8n.onnx".to_string(),
            input_width: 416,
            input_height: 416,
            num_threads: 4,
            class_names: coco_class_names(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub vehicle_classes: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            iou_threshold: 0.45,
            vehicle_classes: VEHICLE_TAXONOMY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Per-frame inference wall-time budget. `None` disables the check.
    pub timeout_ms: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self { timeout_ms: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub history_capacity: usize,
    /// Optional JSON-lines export path for CameraData records.
    pub output_path: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            output_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let conf = self.detection.confidence_threshold;
        anyhow::ensure!(
            conf > 0.0 && conf < 1.0,
            "confidence_threshold must be in (0, 1), got {conf}"
        );
        let iou = self.detection.iou_threshold;
        anyhow::ensure!(
            iou > 0.0 && iou < 1.0,
            "iou_threshold must be in (0, 1), got {iou}"
        );
        anyhow::ensure!(
            self.detection.vehicle_classes.iter().all(|c| !c.is_empty()),
            "vehicle_classes must not contain empty labels"
        );
        anyhow::ensure!(
            self.model.input_width > 0 && self.model.input_height > 0,
            "model input dimensions must be positive"
        );
        anyhow::ensure!(
            self.telemetry.history_capacity > 0,
            "history_capacity must be positive"
        );
        Ok(())
    }
}

/// The 80 COCO class names, in model output order.
pub fn coco_class_names() -> Vec<String> {
    [
        "person",
        "bicycle",
        "car",
        "motorcycle",
        "airplane",
        "bus",
        "train",
        "truck",
        "boat",
        "traffic light",
        "fire hydrant",
        "stop sign",
        "parking meter",
        "bench",
        "bird",
        "cat",
        "dog",
        "horse",
        "sheep",
        "cow",
        "elephant",
        "bear",
        "zebra",
        "giraffe",
        "backpack",
        "umbrella",
        "handbag",
        "tie",
        "suitcase",
        "frisbee",
        "skis",
        "snowboard",
        "sports ball",
        "kite",
        "baseball bat",
        "baseball glove",
        "skateboard",
        "surfboard",
        "tennis racket",
        "bottle",
        "wine glass",
        "cup",
        "fork",
        "knife",
        "spoon",
        "bowl",
        "banana",
        "apple",
        "sandwich",
        "orange",
        "broccoli",
        "carrot",
        "hot dog",
        "pizza",
        "donut",
        "cake",
        "chair",
        "couch",
        "potted plant",
        "bed",
        "dining table",
        "toilet",
        "tv",
        "laptop",
        "mouse",
        "remote",
        "keyboard",
        "cell phone",
        "microwave",
        "oven",
        "toaster",
        "sink",
        "refrigerator",
        "book",
        "clock",
        "vase",
        "scissors",
        "teddy bear",
        "hair drier",
        "toothbrush",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
