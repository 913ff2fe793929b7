//! LSTM inference
//!
//! Forward pass for stacked LSTM and dense layers using the Keras weight
//! layout: kernels are `(input_dim, 4 * units)` and recurrent kernels
//! `(units, 4 * units)` with gate blocks ordered input, forget, cell, output.
//!
//! The forward pass computes, per time step:
//! - i_t = sigmoid(x_t W_i + h_{t-1} U_i + b_i)
//! - f_t = sigmoid(x_t W_f + h_{t-1} U_f + b_f)
//! - g_t = tanh(x_t W_c + h_{t-1} U_c + b_c)
//! - o_t = sigmoid(x_t W_o + h_{t-1} U_o + b_o)
//! - c_t = f_t * c_{t-1} + i_t * g_t
//! - h_t = o_t * tanh(c_t)

use ndarray::{s, Array1, Array2, Array3, Axis};
use pricing_spi::{PricingError, Result, SequenceModel};
use serde::{Deserialize, Serialize};

/// Element-wise activation applied by dense layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// One LSTM layer
#[derive(Debug, Clone, PartialEq)]
pub struct LstmLayer {
    units: usize,
    kernel: Array2<f64>,
    recurrent_kernel: Array2<f64>,
    bias: Array1<f64>,
    return_sequences: bool,
}

impl LstmLayer {
    /// Build a layer, checking the Keras weight layout.
    pub fn new(
        kernel: Array2<f64>,
        recurrent_kernel: Array2<f64>,
        bias: Array1<f64>,
        return_sequences: bool,
    ) -> Result<Self> {
        let units = recurrent_kernel.nrows();
        if units == 0 {
            return Err(PricingError::ArtifactFormat("LSTM layer has zero units".to_string()));
        }
        if recurrent_kernel.ncols() != 4 * units {
            return Err(PricingError::shape_mismatch(
                &[units, 4 * units],
                recurrent_kernel.shape(),
            ));
        }
        if kernel.ncols() != 4 * units {
            return Err(PricingError::shape_mismatch(
                &[kernel.nrows(), 4 * units],
                kernel.shape(),
            ));
        }
        if bias.len() != 4 * units {
            return Err(PricingError::shape_mismatch(&[4 * units], bias.shape()));
        }
        Ok(Self {
            units,
            kernel,
            recurrent_kernel,
            bias,
            return_sequences,
        })
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn input_dim(&self) -> usize {
        self.kernel.nrows()
    }

    pub fn return_sequences(&self) -> bool {
        self.return_sequences
    }

    pub fn kernel(&self) -> &Array2<f64> {
        &self.kernel
    }

    pub fn recurrent_kernel(&self) -> &Array2<f64> {
        &self.recurrent_kernel
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    /// Run the layer over `(batch, steps, input_dim)`.
    fn forward(&self, input: &Array3<f64>) -> Activations {
        let (batch, steps, _) = input.dim();
        let u = self.units;
        let mut h = Array2::<f64>::zeros((batch, u));
        let mut c = Array2::<f64>::zeros((batch, u));
        let mut sequence = Array3::<f64>::zeros((batch, steps, u));

        for t in 0..steps {
            let x_t = input.slice(s![.., t, ..]);
            let z = x_t.dot(&self.kernel) + h.dot(&self.recurrent_kernel) + &self.bias;

            let i = z.slice(s![.., 0..u]).mapv(sigmoid);
            let f = z.slice(s![.., u..2 * u]).mapv(sigmoid);
            let g = z.slice(s![.., 2 * u..3 * u]).mapv(f64::tanh);
            let o = z.slice(s![.., 3 * u..4 * u]).mapv(sigmoid);

            c = &f * &c + &i * &g;
            h = &o * &c.mapv(f64::tanh);
            sequence.slice_mut(s![.., t, ..]).assign(&h);
        }

        if self.return_sequences {
            Activations::Sequence(sequence)
        } else {
            Activations::Vector(h)
        }
    }
}

/// Fully connected layer, applied per time step on sequences
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    kernel: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    pub fn new(kernel: Array2<f64>, bias: Array1<f64>, activation: Activation) -> Result<Self> {
        if kernel.ncols() == 0 {
            return Err(PricingError::ArtifactFormat("dense layer has zero units".to_string()));
        }
        if bias.len() != kernel.ncols() {
            return Err(PricingError::shape_mismatch(&[kernel.ncols()], bias.shape()));
        }
        Ok(Self {
            kernel,
            bias,
            activation,
        })
    }

    pub fn units(&self) -> usize {
        self.kernel.ncols()
    }

    pub fn input_dim(&self) -> usize {
        self.kernel.nrows()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn kernel(&self) -> &Array2<f64> {
        &self.kernel
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    fn apply_2d(&self, x: &Array2<f64>) -> Array2<f64> {
        let act = self.activation;
        (x.dot(&self.kernel) + &self.bias).mapv(|v| act.apply(v))
    }

    fn forward(&self, input: Activations) -> Result<Activations> {
        match input {
            Activations::Vector(x) => Ok(Activations::Vector(self.apply_2d(&x))),
            Activations::Sequence(x) => {
                let (batch, steps, width) = x.dim();
                let flat = x
                    .into_shape((batch * steps, width))
                    .map_err(|e| PricingError::NumericalError(e.to_string()))?;
                let out = self
                    .apply_2d(&flat)
                    .into_shape((batch, steps, self.units()))
                    .map_err(|e| PricingError::NumericalError(e.to_string()))?;
                Ok(Activations::Sequence(out))
            }
        }
    }
}

/// A network layer
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Lstm(LstmLayer),
    Dense(DenseLayer),
}

/// Intermediate tensor between layers
enum Activations {
    /// `(batch, steps, width)`
    Sequence(Array3<f64>),
    /// `(batch, width)`
    Vector(Array2<f64>),
}

/// Stack of LSTM and dense layers over a fixed input window
#[derive(Debug, Clone, PartialEq)]
pub struct LstmNetwork {
    name: String,
    steps: usize,
    features: usize,
    layers: Vec<Layer>,
    output_len: usize,
}

impl LstmNetwork {
    /// Build a network, checking that consecutive layers line up.
    ///
    /// The first layer must be an LSTM reading `features` columns, and no
    /// LSTM may follow a layer that has already collapsed the time axis.
    pub fn new(name: &str, steps: usize, features: usize, layers: Vec<Layer>) -> Result<Self> {
        if steps == 0 || features == 0 {
            return Err(PricingError::ArtifactFormat(format!(
                "input window must be non-empty, got {}x{}",
                steps, features
            )));
        }
        if !matches!(layers.first(), Some(Layer::Lstm(_))) {
            return Err(PricingError::ArtifactFormat(
                "network must start with an LSTM layer".to_string(),
            ));
        }

        let mut width = features;
        let mut sequential = true;
        for (index, layer) in layers.iter().enumerate() {
            let expected = match layer {
                Layer::Lstm(l) => l.input_dim(),
                Layer::Dense(d) => d.input_dim(),
            };
            if expected != width {
                return Err(PricingError::ArtifactFormat(format!(
                    "layer {} expects {} inputs but receives {}",
                    index, expected, width
                )));
            }
            match layer {
                Layer::Lstm(l) => {
                    if !sequential {
                        return Err(PricingError::ArtifactFormat(format!(
                            "LSTM layer {} follows a layer without return_sequences",
                            index
                        )));
                    }
                    width = l.units();
                    sequential = l.return_sequences();
                }
                Layer::Dense(d) => width = d.units(),
            }
        }

        let output_len = if sequential { steps * width } else { width };
        Ok(Self {
            name: name.to_string(),
            steps,
            features,
            layers,
            output_len,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

impl SequenceModel for LstmNetwork {
    fn predict(&self, input: &Array3<f64>) -> Result<Array2<f64>> {
        self.check_input(input)?;
        let batch = input.len_of(Axis(0));

        let mut activations = Activations::Sequence(input.to_owned());
        for layer in &self.layers {
            activations = match (layer, activations) {
                (Layer::Lstm(l), Activations::Sequence(x)) => l.forward(&x),
                (Layer::Lstm(_), Activations::Vector(_)) => {
                    return Err(PricingError::NumericalError(
                        "LSTM layer received a collapsed sequence".to_string(),
                    ))
                }
                (Layer::Dense(d), x) => d.forward(x)?,
            };
        }

        let output = match activations {
            Activations::Vector(x) => x,
            Activations::Sequence(x) => {
                let (b, steps, width) = x.dim();
                x.into_shape((b, steps * width))
                    .map_err(|e| PricingError::NumericalError(e.to_string()))?
            }
        };

        if output.iter().any(|v| !v.is_finite()) {
            return Err(PricingError::NumericalError(
                "model produced a non-finite value".to_string(),
            ));
        }
        debug_assert_eq!(output.dim(), (batch, self.output_len));
        Ok(output)
    }

    fn input_shape(&self) -> (usize, usize) {
        (self.steps, self.features)
    }

    fn output_len(&self) -> usize {
        self.output_len
    }

    fn name(&self) -> &str {
        &self.name
    }
}
