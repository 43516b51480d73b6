//! Syntax highlighting example
//!
//! Run with: cargo run -p markdansi --features syntax-highlighting --example syntax_highlighting

use markdansi::syntax::SyntaxHighlighter;
use markdansi::{RenderOptions, render};

fn main() {
    println!("=== markdansi syntax highlighting ===\n");

    let markdown = r#"
## Rust

```rust
fn main() {
    let message = "Hello, World!";
    for i in 0..3 {
        println!("{message} #{i}");
    }
}
```

## Python

```py
def greet(name: str) -> str:
    return f"Hello, {name}!"
```

## Untagged diff

```
--- a/greeting.txt
+++ b/greeting.txt
@@ -1 +1 @@
-hello
+hello, world
```
"#;

    let plain = RenderOptions::new().color(true).code_gutter(true);
    println!("--- without highlighter ---");
    println!("{}", render(markdown, &plain));

    let highlighted = plain.shared_highlighter(SyntaxHighlighter::default().into_fn());
    println!("--- with base16-ocean.dark ---");
    println!("{}", render(markdown, &highlighted));
}
