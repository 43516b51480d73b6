//! Theme gallery - preview every built-in theme
//!
//! Run with: cargo run -p markdansi --example theme_gallery

use markdansi::{RenderOptions, ThemeName, render};

const SAMPLE: &str = r#"
# Heading

Some **strong** text, some *emphasis*, `inline code` and a [link](https://example.com).

- first item
- [x] finished task

> A quoted line.

```sh
echo "boxed"
echo "code"
```

| Column | Value |
| --- | ---: |
| width | 80 |

---
"#;

fn main() {
    println!("=== markdansi theme gallery ===\n");
    for name in ThemeName::ALL {
        println!("Theme: {name}");
        println!("{}", "-".repeat(40));
        let options = RenderOptions::new().color(true).width(60).theme(name);
        println!("{}", render(SAMPLE, &options));
    }
}
