use envtag::Env;

#[derive(Env)]
struct Config {
    #[env(default = 3)]
    pub workers: u32,
}

fn main() {}
