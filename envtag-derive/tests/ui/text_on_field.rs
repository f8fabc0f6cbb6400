use envtag::Env;

#[derive(Env)]
struct Config {
    #[env(text)]
    pub level: String,
}

fn main() {}
