use envtag::Env;

#[derive(Env)]
struct Config {
    #[env(skip, name = "PORT")]
    pub port: u16,
}

fn main() {}
