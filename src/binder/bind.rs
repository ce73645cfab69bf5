//! Binding request query parameters into a structure.

use serde::de::DeserializeOwned;
use log::debug;

use crate::binder::bag::QueryBag;
use crate::coerce::StructDeserializer;
use crate::context::HttpContext;
use crate::error::Error;

/// A URL the bag can be seeded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    /// The `Referer` header: the page whose URL state is being updated.
    Referer,
    /// The request target itself.
    OriginalUrl,
}

impl SeedSource {
    /// Candidate sources, in the order they are tried.
    pub const ORDER: [SeedSource; 2] = [SeedSource::Referer, SeedSource::OriginalUrl];

    fn read<C: HttpContext + ?Sized>(self, ctx: &C) -> Option<&str> {
        match self {
            SeedSource::Referer => ctx.referer(),
            SeedSource::OriginalUrl => Some(ctx.original_url()),
        }
    }
}

/// Build the merged query bag of a request.
///
/// The first source in [`SeedSource::ORDER`] with a non-empty URL seeds the
/// bag; the live query parameters are then overlaid, replacing seeded
/// values of the same key.
///
/// # Errors
///
/// `Error::MalformedUrl` if the seed URL or the live query is malformed.
pub fn merged_query<C: HttpContext + ?Sized>(ctx: &C) -> Result<QueryBag, Error> {
    let seed = SeedSource::ORDER
        .into_iter()
        .find_map(|source| source.read(ctx).filter(|url| !url.is_empty()).map(|url| (source, url)));

    let mut bag = match seed {
        Some((source, url)) => {
            debug!("Seeding query bag from {source:?}: {url}");
            QueryBag::from_url(url)?
        }
        None => QueryBag::new(),
    };

    ctx.query_params(&mut bag)?;
    Ok(bag)
}

/// Bind the query parameters of a request into a new `T`.
///
/// # Examples
///
/// ```
/// use querybind::{bind, Exchange};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Search {
///     q: String,
///     page: u32,
/// }
///
/// let exchange = Exchange::new("GET", "/search?q=rust&page=2");
/// let search: Search = bind(&exchange).unwrap();
/// assert_eq!(search.q, "rust");
/// assert_eq!(search.page, 2);
/// ```
///
/// # Errors
///
/// The first coercion error, or `Error::MalformedUrl`. No partially bound
/// value is returned.
pub fn bind<T, C>(ctx: &C) -> Result<T, Error>
where
    T: DeserializeOwned,
    C: HttpContext + ?Sized,
{
    let bag = merged_query(ctx)?;
    bind_bag(&bag)
}

/// Bind an explicit query bag into a new `T`.
///
/// Keys that are missing or empty leave their field at its zero value.
pub fn bind_bag<T: DeserializeOwned>(bag: &QueryBag) -> Result<T, Error> {
    T::deserialize(StructDeserializer::new(|key: &str| bag.get(key)))
}
