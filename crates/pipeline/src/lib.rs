//! The seven stage agents (Planner through Editor) and the word-budget
//! convergence loop they share (spec §4).

pub mod convergence;
pub mod editor;
pub mod outline_parser;
pub mod outliner;
pub mod plan_parser;
pub mod planner;
pub mod researcher;
pub mod scripter;
pub mod tone_annotator;
pub mod tone_parser;

pub use convergence::{run_convergence_loop, ConvergenceOutcome};
pub use editor::{Editor, EditorInput};
pub use outliner::{Outliner, OutlinerInput};
pub use planner::Planner;
pub use researcher::{Researcher, ResearcherInput};
pub use scripter::{generate_all, Scripter, ScripterInput, DEFAULT_MAX_CONCURRENT_CHAPTERS};
pub use tone_annotator::ToneAnnotator;
