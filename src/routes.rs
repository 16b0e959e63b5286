use crate::api::ApiClient;
use crate::error::Error;
use crate::model::*;
use actix_identity::Identity;
use actix_web::{error::UrlencodedError, web, HttpRequest, HttpResponse};
use log::{info, warn};
use serde::Deserialize;

type Tera = web::Data<tera::Tera>;
type Api = web::Data<ApiClient>;

/// Route table. Every page is rendered inside `base.html`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/movies", web::get().to(movies))
        .route("/movies/{movie_id}", web::get().to(movie))
        .service(
            web::resource("/movies/{movie_id}/ratings")
                .app_data(form_config())
                .route(web::post().to(rate_movie)),
        )
        .service(
            web::resource("/login")
                .app_data(form_config())
                .route(web::get().to(login))
                .route(web::post().to(login_post)),
        )
        .route("/logout", web::get().to(logout))
        .route("/me", web::get().to(your_ratings));
}

/// Unparseable form posts render the error page instead of actix's plain-text 400.
fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err: UrlencodedError, _req: &HttpRequest| {
        Error::BadForm(err.to_string()).into()
    })
}

fn session(id: &Identity) -> Option<Session> {
    id.identity()
        .and_then(|identity| Session::from_identity(&identity))
}

fn page(session: &Option<Session>) -> tera::Context {
    let mut ctx = tera::Context::new();
    ctx.insert("session", session);
    ctx
}

fn render(tera: &tera::Tera, template: &str, ctx: &tera::Context) -> Result<HttpResponse, Error> {
    let body = tera.render(template, ctx)?;
    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found().header("location", location).finish()
}

fn parse_movie_id(raw: &str) -> Result<u64, Error> {
    raw.parse().map_err(|_| Error::NotFound)
}

fn parse_score(raw: &str) -> Result<u8, Error> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|score| (1..=5).contains(score))
        .ok_or_else(|| Error::InvalidScore(raw.to_owned()))
}

async fn index(id: Identity, tera: Tera) -> Result<HttpResponse, Error> {
    render(&tera, "index.html", &page(&session(&id)))
}

async fn movies(id: Identity, tera: Tera, api: Api) -> Result<HttpResponse, Error> {
    let movies = api.movies().await?;
    let mut ctx = page(&session(&id));
    ctx.insert("movies", &movies);
    render(&tera, "movies.html", &ctx)
}

async fn movie(
    path: web::Path<String>,
    id: Identity,
    tera: Tera,
    api: Api,
) -> Result<HttpResponse, Error> {
    let movie = api.movie(parse_movie_id(&path)?).await?;
    let mut ctx = page(&session(&id));
    ctx.insert("movie", &movie);
    render(&tera, "movie.html", &ctx)
}

#[derive(Deserialize)]
struct RatingParams {
    score: String,
}

async fn rate_movie(
    path: web::Path<String>,
    params: web::Form<RatingParams>,
    id: Identity,
    api: Api,
) -> Result<HttpResponse, Error> {
    let movie_id = parse_movie_id(&path)?;
    let score = parse_score(&params.score)?;
    let rating_id = api
        .create_rating(session(&id).as_ref(), &NewRating { movie_id, score })
        .await?;
    match rating_id {
        Some(rating_id) => info!("created rating {} for movie {}", rating_id, movie_id),
        None => info!("created rating for movie {}", movie_id),
    }
    Ok(redirect("/me"))
}

async fn login(req: HttpRequest, id: Identity, tera: Tera) -> Result<HttpResponse, Error> {
    let flags = req.query_string().split('&').collect::<Vec<_>>();
    let mut ctx = page(&session(&id));
    ctx.insert("failed", &flags.contains(&"failed"));
    ctx.insert("logged_out", &flags.contains(&"logout"));
    render(&tera, "login.html", &ctx)
}

async fn login_post(
    params: web::Form<Credentials>,
    id: Identity,
    api: Api,
) -> Result<HttpResponse, Error> {
    match api.authenticate(&params).await? {
        Some(session) => {
            info!("logged in {}", session.email);
            let identity = session.to_identity()?;
            if !Session::identity_fits_cookie(&identity) {
                warn!(
                    "session for {} is {} bytes, browsers may drop the auth cookie",
                    session.email,
                    identity.len()
                );
            }
            id.remember(identity);
            Ok(redirect("/me"))
        }
        None => Ok(redirect("/login?failed")),
    }
}

async fn logout(id: Identity) -> HttpResponse {
    id.forget();
    redirect("/login?logout")
}

async fn your_ratings(id: Identity, tera: Tera, api: Api) -> Result<HttpResponse, Error> {
    let session = session(&id);
    let ratings = api.ratings(session.as_ref()).await?;
    let mut ctx = page(&session);
    ctx.insert("ratings", &ratings);
    render(&tera, "ratings.html", &ctx)
}

pub async fn not_found() -> Result<HttpResponse, Error> {
    Err(Error::NotFound)
}
