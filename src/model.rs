use std::fs;

use image::{imageops::FilterType, DynamicImage};
use tensorflow::{Graph, ImportGraphDefOptions, Session, SessionOptions, SessionRunArgs, Tensor};

use crate::error::ModelError;

const IMAGE_DIMENSIONS: (u64, u64, u64) = (128, 128, 3);

/// Produces a class probability vector for one encoded image.
pub trait Classifier {
    fn predict(&self, image_data: &[u8]) -> Result<Vec<f32>, ModelError>;
}

/// Frozen TensorFlow graph with a single image input and a softmax output.
pub struct Model {
    session: Session,
    graph: Graph,
    input_op: String,
    output_op: String,
}

impl Model {
    pub fn new(model_path: &str, input_op: &str, output_op: &str) -> Result<Self, ModelError> {
        let mut graph = Graph::new();
        let model_bytes = fs::read(model_path)?;

        graph.import_graph_def(&model_bytes, &ImportGraphDefOptions::new())?;

        let session = Session::new(&SessionOptions::new(), &graph)?;

        tracing::info!(path = model_path, "model loaded");

        Ok(Model {
            session,
            graph,
            input_op: input_op.to_string(),
            output_op: output_op.to_string(),
        })
    }
}

impl Classifier for Model {
    fn predict(&self, image_data: &[u8]) -> Result<Vec<f32>, ModelError> {
        let input_tensor = preprocess_image(image_data)?;

        let mut args = SessionRunArgs::new();

        let input_operation = self
            .graph
            .operation_by_name(&self.input_op)
            .map_err(tensorflow::Status::from)?
            .ok_or_else(|| ModelError::MissingOperation(self.input_op.clone()))?;

        let output_operation = self
            .graph
            .operation_by_name(&self.output_op)
            .map_err(tensorflow::Status::from)?
            .ok_or_else(|| ModelError::MissingOperation(self.output_op.clone()))?;

        args.add_feed(&input_operation, 0, &input_tensor);
        let output_token = args.request_fetch(&output_operation, 0);
        self.session.run(&mut args)?;
        let output_tensor: Tensor<f32> = args.fetch(output_token)?;

        Ok(output_tensor.to_vec())
    }
}

/// Decodes an image into the `[1, 128, 128, 3]` tensor the models were
/// trained on, with channels scaled to `[0, 1]`.
fn preprocess_image(image_data: &[u8]) -> Result<Tensor<f32>, ModelError> {
    let img = image::load_from_memory(image_data)?;
    let flat_img = image_to_input(&img);

    let mut tensor = Tensor::new(&[1, IMAGE_DIMENSIONS.0, IMAGE_DIMENSIONS.1, IMAGE_DIMENSIONS.2]);
    tensor.copy_from_slice(&flat_img);

    Ok(tensor)
}

fn image_to_input(img: &DynamicImage) -> Vec<f32> {
    let resized = img
        .resize_exact(
            IMAGE_DIMENSIONS.0 as u32,
            IMAGE_DIMENSIONS.1 as u32,
            FilterType::Nearest,
        )
        .to_rgb8();

    let mut flat_img =
        Vec::with_capacity((IMAGE_DIMENSIONS.0 * IMAGE_DIMENSIONS.1 * IMAGE_DIMENSIONS.2) as usize);

    for pixel in resized.pixels() {
        flat_img.push(pixel[0] as f32 / 255.0);
        flat_img.push(pixel[1] as f32 / 255.0);
        flat_img.push(pixel[2] as f32 / 255.0);
    }

    flat_img
}

/// Index of the most probable class and its probability as a percentage.
pub fn top_class(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((i, p)),
        })
        .map(|(i, p)| (i, p * 100.0))
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;

    #[test]
    fn top_class_picks_first_maximum() {
        assert_eq!(top_class(&[0.125, 0.5, 0.5, 0.25]), Some((1, 50.0)));
        assert_eq!(top_class(&[]), None);
    }

    #[test]
    fn input_is_resized_rgb_in_unit_range() {
        let gray = GrayImage::from_pixel(300, 200, Luma([255]));
        let input = image_to_input(&DynamicImage::ImageLuma8(gray));
        assert_eq!(input.len(), 128 * 128 * 3);
        assert!(input.iter().all(|&v| (v - 1.0).abs() < f32::EPSILON));
    }
}
