// offense-norm/src/ui/mod.rs
pub mod output;
