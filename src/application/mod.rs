// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers; holds no ML code and does no
// printing.
//
//   annotator.rs         — recognize → highlight → aggregate for
//                          one text, Records and ResultSets
//   session.rs           — per-user state: results, paging,
//                          modality, last error
//   annotate_use_case.rs — PipelineConfig and the batch run that
//                          the CLI drives

pub mod annotator;

pub mod session;

// The batch workflow
pub mod annotate_use_case;
