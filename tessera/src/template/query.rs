use super::dictionary::{Dictionary, ResourceKind};
use model::{CollectionAttributeFilter, LinkAttributeFilter, Query, QueryStem};
use tracing::warn;

/// Rewrites every id in a query against the dictionary.
///
/// Unset stem fields stay unset and empty ones stay empty. A link type or
/// filter reference without a mapping becomes `None` in place, so the chain
/// keeps its positions and the filter keeps its condition. A document id
/// without a mapping becomes a `None` member of the set. A stem whose root collection
/// cannot be mapped ends up with no root, see [`unresolved_stem_roots`].
pub fn translate_query(query: &Query, dictionary: &Dictionary) -> Query {
    Query {
        stems: query
            .stems
            .iter()
            .map(|stem| translate_stem(stem, dictionary))
            .collect(),
        fulltexts: query.fulltexts.clone(),
        page: query.page,
        page_size: query.page_size,
    }
}

/// Stem root collections of `query` that have no mapping.
pub fn unresolved_stem_roots<'q>(query: &'q Query, dictionary: &Dictionary) -> Vec<&'q str> {
    query
        .collection_ids()
        .filter(|id| dictionary.get(ResourceKind::Collection, id).is_none())
        .collect()
}

fn translate_stem(stem: &QueryStem, dictionary: &Dictionary) -> QueryStem {
    let resolve = |kind: ResourceKind, id: Option<&str>| -> Option<String> {
        let id = id?;
        let real = dictionary.get(kind, id).map(str::to_string);
        if real.is_none() {
            warn!(%kind, placeholder = id, "unresolved template reference");
        }
        real
    };

    QueryStem {
        collection_id: resolve(ResourceKind::Collection, stem.collection_id.as_deref()),
        link_type_ids: stem.link_type_ids.as_ref().map(|ids| {
            ids.iter()
                .map(|id| resolve(ResourceKind::LinkType, id.as_deref()))
                .collect()
        }),
        document_ids: stem.document_ids.as_ref().map(|ids| {
            ids.iter()
                .map(|id| resolve(ResourceKind::Document, id.as_deref()))
                .collect()
        }),
        filters: stem.filters.as_ref().map(|filters| {
            filters
                .iter()
                .map(|filter| CollectionAttributeFilter {
                    collection_id: resolve(
                        ResourceKind::Collection,
                        filter.collection_id.as_deref(),
                    ),
                    ..filter.clone()
                })
                .collect()
        }),
        link_filters: stem.link_filters.as_ref().map(|filters| {
            filters
                .iter()
                .map(|filter| LinkAttributeFilter {
                    link_type_id: resolve(ResourceKind::LinkType, filter.link_type_id.as_deref()),
                    ..filter.clone()
                })
                .collect()
        }),
    }
}
