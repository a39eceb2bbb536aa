// ============================================================
// Layer 5 — Transformer Token Classifier
// ============================================================
// Encoder-only transformer that assigns one label logit vector
// to every input token:
//
//   input_ids [batch, seq]
//     → token embedding + learned position embedding
//     → N × EncoderLayer (attention, feed-forward; post-norm)
//     → layer norm
//     → label head → logits [batch, seq, num_labels]
//
// The label set (e.g. O, B-SEAWEED, I-SEAWEED, B-LOCATION,
// I-LOCATION) lives in the checkpoint manifest; the model only
// knows how many there are. Weights come from an externally
// trained checkpoint, this crate never trains.

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig, Embedding, EmbeddingConfig, Gelu, LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

// #[derive(Config)] also provides Clone and serde support
#[derive(Config, Debug)]
pub struct TransformerNerConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    pub num_labels:  usize,
    #[config(default = 0.0)]
    pub dropout:     f64,
}

impl TransformerNerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TransformerNerModel<B> {
        let layer = EncoderLayerConfig::new(self.d_model, self.num_heads, self.d_ff)
            .with_dropout(self.dropout);

        TransformerNerModel {
            token_embedding:    EmbeddingConfig::new(self.vocab_size, self.d_model).init(device),
            position_embedding: EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device),
            layers:             (0..self.num_layers).map(|_| layer.init(device)).collect(),
            output_norm:        LayerNormConfig::new(self.d_model).init(device),
            label_head:         LinearConfig::new(self.d_model, self.num_labels).init(device),
            embed_dropout:      DropoutConfig::new(self.dropout).init(),
        }
    }
}

// ─── Encoder layer ────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct EncoderLayerConfig {
    pub d_model:   usize,
    pub num_heads: usize,
    pub d_ff:      usize,
    #[config(default = 0.0)]
    pub dropout:   f64,
}

impl EncoderLayerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EncoderLayer<B> {
        EncoderLayer {
            attention: MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
                .with_dropout(self.dropout)
                .init(device),
            attn_norm: LayerNormConfig::new(self.d_model).init(device),
            ff_in:     LinearConfig::new(self.d_model, self.d_ff).init(device),
            ff_out:    LinearConfig::new(self.d_ff, self.d_model).init(device),
            ff_norm:   LayerNormConfig::new(self.d_model).init(device),
            gelu:      Gelu::new(),
            dropout:   DropoutConfig::new(self.dropout).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct EncoderLayer<B: Backend> {
    attention: MultiHeadAttention<B>,
    attn_norm: LayerNorm<B>,
    ff_in:     Linear<B>,
    ff_out:    Linear<B>,
    ff_norm:   LayerNorm<B>,
    gelu:      Gelu,
    dropout:   Dropout,
}

impl<B: Backend> EncoderLayer<B> {
    /// [batch, seq, d_model] → [batch, seq, d_model]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attended = self.attention.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.attn_norm.forward(x + self.dropout.forward(attended));

        let hidden = self.gelu.forward(self.ff_in.forward(x.clone()));
        let ff     = self.ff_out.forward(hidden);
        self.ff_norm.forward(x + self.dropout.forward(ff))
    }
}

// ─── Full model ───────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct TransformerNerModel<B: Backend> {
    token_embedding:    Embedding<B>,
    position_embedding: Embedding<B>,
    layers:             Vec<EncoderLayer<B>>,
    output_norm:        LayerNorm<B>,
    label_head:         Linear<B>,
    embed_dropout:      Dropout,
}

impl<B: Backend> TransformerNerModel<B> {
    /// input_ids: [batch, seq] → logits: [batch, seq, num_labels].
    /// `seq` must not exceed the configured max_seq_len.
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch, seq] = input_ids.dims();
        let device = input_ids.device();

        let positions = Tensor::<B, 1, Int>::arange(0..seq as i64, &device)
            .unsqueeze::<2>()
            .expand([batch, seq]);

        let embedded = self.token_embedding.forward(input_ids)
            + self.position_embedding.forward(positions);

        let hidden = self
            .layers
            .iter()
            .fold(self.embed_dropout.forward(embedded), |x, layer| layer.forward(x));

        self.label_head.forward(self.output_norm.forward(hidden))
    }
}
