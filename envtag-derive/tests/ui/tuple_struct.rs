use envtag::Env;

#[derive(Env)]
struct Port(pub u16);

fn main() {}
