use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use plateread::{ALPHABET, Inference, InferenceError, ModelTensor, Rectangle};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Creates a white RGB image of the given size.
pub fn blank_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

/// Draws a solid black rectangle.
pub fn draw_solid(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), BLACK);
}

/// Draws a black frame with a white interior.
pub fn draw_frame(img: &mut RgbImage, x: i32, y: i32, w: u32, h: u32, tx: u32, ty: u32) {
    draw_solid(img, x, y, w, h);
    draw_filled_rect_mut(
        img,
        Rect::at(x + tx as i32, y + ty as i32).of_size(w - 2 * tx, h - 2 * ty),
        WHITE,
    );
}

/// Draws the three test glyphs of `synthetic_plate` with their top-left corner at (ox, oy).
/// Left to right: a solid block ("A"), a hollow frame ("B"), a narrow bar ("1").
pub fn draw_test_glyphs(img: &mut RgbImage, ox: i32, oy: i32) {
    draw_solid(img, ox + 10, oy + 25, 20, 50);
    draw_frame(img, ox + 60, oy + 25, 20, 50, 5, 8);
    draw_solid(img, ox + 110, oy + 25, 5, 50);
}

/// Creates a 200x100 plate crop holding three well separated glyph shapes
/// at x = 10, 60 and 110.
pub fn synthetic_plate() -> RgbImage {
    let mut img = blank_image(200, 100);
    draw_test_glyphs(&mut img, 0, 0);
    img
}

/// Creates a 400x300 scene with the synthetic plate at (50, 50) and the
/// detector region that encloses it.
pub fn synthetic_scene() -> (RgbImage, Rectangle) {
    let mut img = blank_image(400, 300);
    draw_test_glyphs(&mut img, 50, 50);
    let region = Rectangle::new(50, 40, 200, 120).expect("non-empty region");
    (img, region)
}

/// Scores with a single hot entry for `ch`.
pub fn one_hot(ch: char) -> Vec<f32> {
    let index = ALPHABET.find(ch).expect("character in alphabet");
    let mut scores = vec![0.0; ALPHABET.len()];
    scores[index] = 1.0;
    scores
}

fn scores_tensor(scores: Vec<f32>) -> Result<ModelTensor, InferenceError> {
    ModelTensor::new(vec![1, scores.len()], scores)
}

/// Classifier stub that tells the test glyphs apart by shape:
/// a dark center means a hollow frame ("B"), a thin bright middle row means
/// a narrow bar ("1"), anything else is a solid block ("A").
pub struct ShapeClassifier;

impl Inference for ShapeClassifier {
    fn predict(&self, input: &ModelTensor) -> Result<ModelTensor, InferenceError> {
        let shape = input.shape();
        assert_eq!(shape, &[1, 28, 28, 3], "classifier input layout");

        let width = shape[2];
        let pixel = |row: usize, col: usize| input.data()[(row * width + col) * 3];

        let ch = if pixel(14, 14) < 128.0 {
            'B'
        } else {
            let bright = (0..width).filter(|&col| pixel(14, col) >= 128.0).count();
            if bright < 18 { '1' } else { 'A' }
        };
        scores_tensor(one_hot(ch))
    }

    fn name(&self) -> &str {
        "shape-stub"
    }
}

/// Classifier stub that always answers with the same alphabet index.
pub struct ConstantClassifier(pub usize);

impl Inference for ConstantClassifier {
    fn predict(&self, _input: &ModelTensor) -> Result<ModelTensor, InferenceError> {
        let mut scores = vec![0.0; ALPHABET.len()];
        scores[self.0] = 1.0;
        scores_tensor(scores)
    }

    fn name(&self) -> &str {
        "constant-stub"
    }
}

/// Classifier stub whose backend always fails.
pub struct FailingClassifier;

impl Inference for FailingClassifier {
    fn predict(&self, _input: &ModelTensor) -> Result<ModelTensor, InferenceError> {
        Err(InferenceError::Backend {
            model: "failing-stub".to_string(),
            message: "backend unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing-stub"
    }
}
