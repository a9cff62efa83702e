// The library's wasm start hook mounts the app; this binary only gives
// trunk an entry point.
fn main() {}
