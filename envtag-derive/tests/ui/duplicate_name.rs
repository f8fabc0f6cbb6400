use envtag::Env;

#[derive(Env)]
struct Config {
    #[env("PORT")]
    #[env(name = "HTTP_PORT")]
    pub port: u16,
}

fn main() {}
