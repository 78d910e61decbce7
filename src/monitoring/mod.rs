/*!
 * Monitoring Module
 * Observability for harness runs
 */

pub mod tracer;

pub use tracer::init_tracing;
