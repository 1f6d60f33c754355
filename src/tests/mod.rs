// Test modules for llm-wrapper
//
// Each source file has a corresponding test file that focuses on business
// logic verification. Dialect conversion tests live beside each provider
// under src/providers/*/tests; HTTP tests against mock servers live in tests/.

pub mod client;
