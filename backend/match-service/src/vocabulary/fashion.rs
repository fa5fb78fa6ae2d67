//! Built-in tag names for the fashion product catalog.

use super::TagKind;

const MASTER_CATEGORIES: &[&str] = &[
    "Apparel",
    "Accessories",
    "Footwear",
    "Personal Care",
    "Free Items",
    "Sporting Goods",
    "Home",
];

const SUB_CATEGORIES: &[&str] = &[
    "Topwear",
    "Bottomwear",
    "Watches",
    "Socks",
    "Shoes",
    "Belts",
    "Flip Flops",
    "Bags",
    "Innerwear",
    "Sandal",
    "Shoe Accessories",
    "Fragrance",
    "Jewellery",
    "Lips",
    "Saree",
    "Eyewear",
    "Nails",
    "Scarves",
    "Dress",
    "Loungewear and Nightwear",
    "Wallets",
    "Apparel Set",
    "Headwear",
    "Mufflers",
    "Skin Care",
    "Makeup",
    "Free Gifts",
    "Ties",
    "Accessories",
    "Skin",
    "Beauty Accessories",
    "Water Bottle",
    "Eyes",
    "Bath and Body",
    "Gloves",
    "Sports Accessories",
    "Cufflinks",
    "Sports Equipment",
    "Stoles",
    "Hair",
    "Perfumes",
    "Home Furnishing",
    "Umbrellas",
    "Wristbands",
    "Vouchers",
];

const ARTICLE_TYPES: &[&str] = &[
    "Shirts",
    "Jeans",
    "Watches",
    "Track Pants",
    "Tshirts",
    "Socks",
    "Casual Shoes",
    "Belts",
    "Flip Flops",
    "Handbags",
    "Tops",
    "Bra",
    "Sandals",
    "Shoe Accessories",
    "Sweatshirts",
    "Deodorant",
    "Formal Shoes",
    "Bracelet",
    "Lipstick",
    "Flats",
    "Kurtas",
    "Waistcoat",
    "Sports Shoes",
    "Shorts",
    "Briefs",
    "Sarees",
    "Perfume and Body Mist",
    "Heels",
    "Sunglasses",
    "Innerwear Vests",
    "Pendant",
    "Nail Polish",
    "Laptop Bag",
    "Scarves",
    "Rain Jacket",
    "Dresses",
    "Night suits",
    "Skirts",
    "Wallets",
    "Blazers",
    "Ring",
    "Kurta Sets",
    "Clutches",
    "Shrug",
    "Backpacks",
    "Caps",
    "Trousers",
    "Earrings",
    "Camisoles",
    "Boxers",
    "Jewellery Set",
    "Dupatta",
    "Capris",
    "Lip Gloss",
    "Bath Robe",
    "Mufflers",
    "Tunics",
    "Jackets",
    "Trunk",
    "Lounge Pants",
    "Face Wash and Cleanser",
    "Necklace and Chains",
    "Duffel Bag",
    "Sports Sandals",
    "Foundation and Primer",
    "Sweaters",
    "Free Gifts",
    "Trolley Bag",
    "Tracksuits",
    "Swimwear",
    "Shoe Laces",
    "Fragrance Gift Set",
    "Bangle",
    "Nightdress",
    "Ties",
    "Baby Dolls",
    "Leggings",
    "Highlighter and Blush",
    "Travel Accessory",
    "Kurtis",
    "Mobile Pouch",
    "Messenger Bag",
    "Lip Care",
    "Face Moisturisers",
    "Compact",
    "Eye Cream",
    "Accessory Gift Set",
    "Beauty Accessory",
    "Jumpsuit",
    "Kajal and Eyeliner",
    "Water Bottle",
    "Suspenders",
    "Lip Liner",
    "Robe",
    "Salwar and Dupatta",
    "Patiala",
    "Stockings",
    "Eyeshadow",
    "Headband",
    "Tights",
    "Nail Essentials",
    "Churidar",
    "Lounge Tshirts",
    "Face Scrub and Exfoliator",
    "Lounge Shorts",
    "Gloves",
    "Mask and Peel",
    "Wristbands",
    "Tablet Sleeve",
    "Ties and Cufflinks",
    "Footballs",
    "Stoles",
    "Shapewear",
    "Nehru Jackets",
    "Salwar",
    "Cufflinks",
    "Jeggings",
    "Hair Colour",
    "Concealer",
    "Rompers",
    "Body Lotion",
    "Sunscreen",
    "Booties",
    "Waist Pouch",
    "Hair Accessory",
    "Rucksacks",
    "Basketballs",
    "Lehenga Choli",
    "Clothing Set",
    "Mascara",
    "Toner",
    "Cushion Covers",
    "Key chain",
    "Makeup Remover",
    "Lip Plumper",
    "Umbrellas",
    "Face Serum and Gel",
    "Hat",
    "Mens Grooming Kit",
    "Rain Trousers",
    "Body Wash and Scrub",
    "Suits",
    "Ipad",
];

const BASE_COLOURS: &[&str] = &[
    "Navy Blue",
    "Blue",
    "Silver",
    "Black",
    "Grey",
    "Green",
    "Purple",
    "White",
    "Beige",
    "Brown",
    "Bronze",
    "Teal",
    "Copper",
    "Pink",
    "Off White",
    "Maroon",
    "Red",
    "Khaki",
    "Orange",
    "Coffee Brown",
    "Yellow",
    "Charcoal",
    "Gold",
    "Steel",
    "Tan",
    "Multi",
    "Magenta",
    "Lavender",
    "Sea Green",
    "Cream",
    "Peach",
    "Olive",
    "Skin",
    "Burgundy",
    "Grey Melange",
    "Rust",
    "Rose",
    "Lime Green",
    "Mauve",
    "Turquoise Blue",
    "Metallic",
    "Mustard",
    "Taupe",
    "Nude",
    "Mushroom Brown",
    "Fluorescent Green",
];

const SEASONS: &[&str] = &["Fall", "Summer", "Winter", "Spring"];

const USAGES: &[&str] = &[
    "Casual",
    "Ethnic",
    "Formal",
    "Sports",
    "Smart Casual",
    "Travel",
    "Party",
    "Home",
];

pub(super) fn namespaces() -> Vec<(TagKind, Vec<&'static str>)> {
    vec![
        (TagKind::MasterCategory, MASTER_CATEGORIES.to_vec()),
        (TagKind::SubCategory, SUB_CATEGORIES.to_vec()),
        (TagKind::ArticleType, ARTICLE_TYPES.to_vec()),
        (TagKind::BaseColour, BASE_COLOURS.to_vec()),
        (TagKind::Season, SEASONS.to_vec()),
        (TagKind::Usage, USAGES.to_vec()),
    ]
}
