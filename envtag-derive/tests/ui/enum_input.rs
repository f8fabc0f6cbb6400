use envtag::Env;

#[derive(Env)]
enum Mode {
    Fast,
    Slow,
}

fn main() {}
